//! # Callback 动作
//!
//! 计时结束时调用一次回调。

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::{ActionObject, ActionPhase, ActionSettings, FrameState, Timeline, step_timer};
use crate::error::{ActionResult, duration_ms};

/// 回调动作
///
/// 时长为 0 时在第一帧立即调用。没有反向语义：`prev_frame` 与 `next_frame` 相同。
/// 克隆出的副本共享同一个回调。倒带后可以再次触发。
#[derive(Clone)]
pub struct CallbackAction {
    settings: ActionSettings,
    timeline: Timeline,
    callback: Rc<dyn Fn()>,
}

impl CallbackAction {
    /// 创建立即触发的回调动作
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self {
            settings: ActionSettings::new(0.0),
            timeline: Timeline::default(),
            callback: Rc::new(callback),
        }
    }

    /// 创建延迟触发的回调动作
    ///
    /// # 参数
    /// - `seconds`: 延迟（秒）
    /// - `callback`: 回调
    pub fn with_delay(seconds: f32, callback: impl Fn() + 'static) -> ActionResult<Self> {
        Ok(Self {
            settings: ActionSettings::new(duration_ms(seconds)?),
            timeline: Timeline::default(),
            callback: Rc::new(callback),
        })
    }

    fn step(&mut self, delta_ms: f32) -> FrameState {
        let already_finished = self.timeline.phase.is_finished();
        let state = step_timer(&self.settings, &mut self.timeline, delta_ms);
        if state == FrameState::Completed && !already_finished {
            debug!(action = %self.settings.name, "调用回调");
            (self.callback)();
        }
        state
    }
}

impl fmt::Debug for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackAction")
            .field("settings", &self.settings)
            .field("timeline", &self.timeline)
            .finish_non_exhaustive()
    }
}

impl ActionObject for CallbackAction {
    fn settings(&self) -> &ActionSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ActionSettings {
        &mut self.settings
    }

    fn phase(&self) -> ActionPhase {
        self.timeline.phase
    }

    fn is_paused(&self) -> bool {
        self.timeline.paused
    }

    fn next_frame(&mut self, delta_ms: f32) -> FrameState {
        self.step(delta_ms)
    }

    fn prev_frame(&mut self, delta_ms: f32) -> FrameState {
        self.step(delta_ms)
    }

    fn pause(&mut self) {
        self.timeline.paused = true;
    }

    fn resume(&mut self) {
        self.timeline.paused = false;
    }

    fn rewind(&mut self) {
        self.timeline.reset();
    }

    fn release(&mut self) {}

    fn clone_action(&self) -> Box<dyn ActionObject> {
        let mut copy = self.clone();
        copy.timeline.reset();
        Box::new(copy)
    }
}
