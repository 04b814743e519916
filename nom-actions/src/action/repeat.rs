//! # Repeat 动作
//!
//! 重复播放子动作：指定次数（`RepeatFor`）或无限次（`RepeatForever`）。
//!
//! 子动作每完成一次就被倒带，目标回到它的起始值，
//! 所以重复 N 次平移之后目标停在 `起点 + delta`，而不是 `起点 + N × delta`。

use tracing::debug;

use super::{
    ActionObject, ActionPhase, ActionSettings, FrameDirection, FrameState, Timeline, apply_speed,
};
use crate::timing::TimingCurve;

/// 重复指定次数
#[derive(Debug)]
pub struct RepeatForAction {
    settings: ActionSettings,
    timeline: Timeline,
    action: Box<dyn ActionObject>,
    num_repeats: u32,
    elapsed_repeats: u32,
}

impl RepeatForAction {
    /// 创建重复动作
    ///
    /// # 参数
    /// - `action`: 子动作
    /// - `num_repeats`: 重复次数，为 0 时第一帧就完成
    pub fn new(action: Box<dyn ActionObject>, num_repeats: u32) -> Self {
        // 0 次时不乘，避免 `∞ × 0` 得到 NaN
        let duration = if num_repeats == 0 {
            0.0
        } else {
            action.duration() * num_repeats as f32
        };
        Self {
            settings: ActionSettings::new(duration),
            timeline: Timeline::default(),
            action,
            num_repeats,
            elapsed_repeats: 0,
        }
    }

    /// 总重复次数
    pub fn num_repeats(&self) -> u32 {
        self.num_repeats
    }

    /// 已完成的重复次数
    pub fn elapsed_repeats(&self) -> u32 {
        self.elapsed_repeats
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        if let Some(state) = self.timeline.gate() {
            return state;
        }
        self.timeline.enter();

        if self.elapsed_repeats >= self.num_repeats {
            return self.timeline.finish();
        }

        if self.action.frame(direction, delta_ms) != FrameState::Completed {
            return FrameState::Playing;
        }

        self.elapsed_repeats += 1;
        debug!(
            action = %self.settings.name,
            elapsed = self.elapsed_repeats,
            total = self.num_repeats,
            "完成一次重复"
        );
        if self.elapsed_repeats < self.num_repeats {
            self.action.rewind();
            FrameState::Playing
        } else {
            self.timeline.finish()
        }
    }
}

impl ActionObject for RepeatForAction {
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
        self.step(FrameDirection::Next, delta_ms)
    }

    fn prev_frame(&mut self, delta_ms: f32) -> FrameState {
        self.step(FrameDirection::Prev, delta_ms)
    }

    fn pause(&mut self) {
        self.timeline.paused = true;
        self.action.pause();
    }

    fn resume(&mut self) {
        self.timeline.paused = false;
        self.action.resume();
    }

    fn rewind(&mut self) {
        self.action.rewind();
        self.elapsed_repeats = 0;
        self.timeline.reset();
    }

    fn release(&mut self) {
        self.action.release();
    }

    fn set_speed(&mut self, speed: f32) {
        if apply_speed(&mut self.settings, speed) {
            self.action.set_speed(speed);
        }
    }

    fn set_timing_curve(&mut self, curve: TimingCurve) {
        self.settings.timing_curve = curve;
        self.action.set_timing_curve(curve);
    }

    fn clone_action(&self) -> Box<dyn ActionObject> {
        Box::new(Self {
            settings: self.settings.clone(),
            timeline: Timeline::default(),
            action: self.action.clone_action(),
            num_repeats: self.num_repeats,
            elapsed_repeats: 0,
        })
    }
}

/// 无限重复
///
/// 永远不会完成，只能通过播放器移除。
#[derive(Debug)]
pub struct RepeatForeverAction {
    settings: ActionSettings,
    timeline: Timeline,
    action: Box<dyn ActionObject>,
    elapsed_repeats: u64,
}

impl RepeatForeverAction {
    /// 创建无限重复动作
    pub fn new(action: Box<dyn ActionObject>) -> Self {
        Self {
            settings: ActionSettings::new(f32::INFINITY),
            timeline: Timeline::default(),
            action,
            elapsed_repeats: 0,
        }
    }

    /// 已完成的重复次数
    pub fn elapsed_repeats(&self) -> u64 {
        self.elapsed_repeats
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        if let Some(state) = self.timeline.gate() {
            return state;
        }
        self.timeline.enter();

        if self.action.frame(direction, delta_ms) == FrameState::Completed {
            self.elapsed_repeats += 1;
            self.action.rewind();
        }
        FrameState::Playing
    }
}

impl ActionObject for RepeatForeverAction {
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
        self.step(FrameDirection::Next, delta_ms)
    }

    fn prev_frame(&mut self, delta_ms: f32) -> FrameState {
        self.step(FrameDirection::Prev, delta_ms)
    }

    fn pause(&mut self) {
        self.timeline.paused = true;
        self.action.pause();
    }

    fn resume(&mut self) {
        self.timeline.paused = false;
        self.action.resume();
    }

    fn rewind(&mut self) {
        self.action.rewind();
        self.elapsed_repeats = 0;
        self.timeline.reset();
    }

    fn release(&mut self) {
        self.action.release();
    }

    fn set_speed(&mut self, speed: f32) {
        if apply_speed(&mut self.settings, speed) {
            self.action.set_speed(speed);
        }
    }

    fn set_timing_curve(&mut self, curve: TimingCurve) {
        self.settings.timing_curve = curve;
        self.action.set_timing_curve(curve);
    }

    fn clone_action(&self) -> Box<dyn ActionObject> {
        Box::new(Self {
            settings: self.settings.clone(),
            timeline: Timeline::default(),
            action: self.action.clone_action(),
            elapsed_repeats: 0,
        })
    }
}
