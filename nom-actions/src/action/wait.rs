//! # WaitForDuration 动作
//!
//! 只计时，不修改任何目标。常用于序列中插入停顿。

use super::{ActionObject, ActionPhase, ActionSettings, FrameState, Timeline, step_timer};
use crate::error::{ActionResult, duration_ms};

/// 等待动作
#[derive(Debug, Clone)]
pub struct WaitForDurationAction {
    settings: ActionSettings,
    timeline: Timeline,
}

impl WaitForDurationAction {
    /// 创建等待动作
    pub fn new(seconds: f32) -> ActionResult<Self> {
        Ok(Self {
            settings: ActionSettings::new(duration_ms(seconds)?),
            timeline: Timeline::default(),
        })
    }

    /// 已经过时间（毫秒）
    pub fn elapsed(&self) -> f32 {
        self.timeline.elapsed
    }
}

impl ActionObject for WaitForDurationAction {
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
        step_timer(&self.settings, &mut self.timeline, delta_ms)
    }

    fn prev_frame(&mut self, delta_ms: f32) -> FrameState {
        step_timer(&self.settings, &mut self.timeline, delta_ms)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_completes_after_duration() {
        let mut wait = WaitForDurationAction::new(1.0).unwrap();

        assert_eq!(wait.next_frame(400.0), FrameState::Playing);
        assert_eq!(wait.next_frame(400.0), FrameState::Playing);
        assert_eq!(wait.elapsed(), 800.0);
        assert_eq!(wait.next_frame(400.0), FrameState::Completed);
        assert_eq!(wait.elapsed(), 1000.0);
    }

    #[test]
    fn test_wait_pause_and_rewind() {
        let mut wait = WaitForDurationAction::new(1.0).unwrap();
        wait.next_frame(300.0);

        wait.pause();
        assert_eq!(wait.next_frame(900.0), FrameState::Paused);
        assert_eq!(wait.elapsed(), 300.0);

        wait.rewind();
        assert_eq!(wait.phase(), ActionPhase::NotStarted);
        assert!(!wait.is_paused());
        assert_eq!(wait.next_frame(900.0), FrameState::Playing);
    }

    #[test]
    fn test_wait_prev_frame_counts_too() {
        let mut wait = WaitForDurationAction::new(0.5).unwrap();
        assert_eq!(wait.prev_frame(500.0), FrameState::Completed);
    }
}
