//! # Group 动作
//!
//! 同时播放多个子动作，最慢的子动作完成时整体完成。

use tracing::debug;

use super::{
    ActionObject, ActionPhase, ActionSettings, FrameDirection, FrameState, Timeline, apply_speed,
};
use crate::error::{ActionError, ActionResult};
use crate::timing::TimingCurve;

/// 并行组合动作
///
/// 已完成的子动作不再推进，保持其最终值。
#[derive(Debug)]
pub struct GroupAction {
    settings: ActionSettings,
    timeline: Timeline,
    actions: Vec<Box<dyn ActionObject>>,
    completed: Vec<bool>,
}

impl GroupAction {
    /// 创建并行组合动作
    ///
    /// 时长取子动作中最长的一个。子动作列表不能为空。
    pub fn new(actions: Vec<Box<dyn ActionObject>>) -> ActionResult<Self> {
        if actions.is_empty() {
            return Err(ActionError::EmptyComposite {
                kind: "GroupAction",
            });
        }
        let duration = actions.iter().map(|a| a.duration()).fold(0.0, f32::max);

        Ok(Self {
            settings: ActionSettings::new(duration),
            timeline: Timeline::default(),
            completed: vec![false; actions.len()],
            actions,
        })
    }

    /// 子动作
    pub fn actions(&self) -> &[Box<dyn ActionObject>] {
        &self.actions
    }

    /// 已完成的子动作数量
    pub fn num_completed(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        if let Some(state) = self.timeline.gate() {
            return state;
        }
        if self.timeline.enter() {
            debug!(action = %self.settings.name, children = self.actions.len(), "并行动作开始");
        }

        for (action, done) in self.actions.iter_mut().zip(self.completed.iter_mut()) {
            if *done {
                continue;
            }
            if action.frame(direction, delta_ms) == FrameState::Completed {
                *done = true;
                debug!(action = %self.settings.name, child = %action.name(), "子动作完成");
            }
        }

        if self.completed.iter().all(|done| *done) {
            debug!(action = %self.settings.name, "并行动作完成");
            self.timeline.finish()
        } else {
            FrameState::Playing
        }
    }
}

impl ActionObject for GroupAction {
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
        self.actions.iter_mut().for_each(|a| a.pause());
    }

    fn resume(&mut self) {
        self.timeline.paused = false;
        self.actions.iter_mut().for_each(|a| a.resume());
    }

    fn rewind(&mut self) {
        // 逆序倒带，共享目标时以第一个子动作的起始值为准
        self.actions.iter_mut().rev().for_each(|a| a.rewind());
        self.completed.fill(false);
        self.timeline.reset();
    }

    fn release(&mut self) {
        self.actions.iter_mut().for_each(|a| a.release());
    }

    fn set_speed(&mut self, speed: f32) {
        if apply_speed(&mut self.settings, speed) {
            self.actions.iter_mut().for_each(|a| a.set_speed(speed));
        }
    }

    fn set_timing_curve(&mut self, curve: TimingCurve) {
        self.settings.timing_curve = curve;
        self.actions.iter_mut().for_each(|a| a.set_timing_curve(curve));
    }

    fn clone_action(&self) -> Box<dyn ActionObject> {
        Box::new(Self {
            settings: self.settings.clone(),
            timeline: Timeline::default(),
            actions: self.actions.iter().map(|a| a.clone_action()).collect(),
            completed: vec![false; self.actions.len()],
        })
    }
}
