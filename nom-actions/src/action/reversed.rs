//! # Reversed 动作
//!
//! 反向播放子动作：`next_frame` 与 `prev_frame` 互换。

use super::{
    ActionObject, ActionPhase, ActionSettings, FrameDirection, FrameState, Timeline, apply_speed,
};
use crate::timing::TimingCurve;

/// 反向动作
#[derive(Debug)]
pub struct ReversedAction {
    settings: ActionSettings,
    timeline: Timeline,
    action: Box<dyn ActionObject>,
}

impl ReversedAction {
    /// 创建反向动作
    pub fn new(action: Box<dyn ActionObject>) -> Self {
        Self {
            settings: ActionSettings::new(action.duration()),
            timeline: Timeline::default(),
            action,
        }
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        if let Some(state) = self.timeline.gate() {
            return state;
        }
        self.timeline.enter();

        match self.action.frame(direction.flip(), delta_ms) {
            FrameState::Completed => self.timeline.finish(),
            state => state,
        }
    }
}

impl ActionObject for ReversedAction {
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
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MoveByAction, ScaleByAction, SequenceAction};
    use crate::math::{Point2i, Size2f, Size2i};
    use crate::target::{Animatable, Sprite};
    use std::rc::Rc;

    #[test]
    fn test_reversed_move_by() {
        let sprite = Rc::new(Sprite::new(Point2i::new(200, 0), Size2i::new(8, 8)));
        let move_by = MoveByAction::new(&sprite, Point2i::new(200, 0), 2.0).unwrap();
        let mut reversed = ReversedAction::new(move_by.boxed());
        assert_eq!(reversed.duration(), 2000.0);

        assert_eq!(reversed.next_frame(1000.0), FrameState::Playing);
        assert_eq!(sprite.position(), Some(Point2i::new(100, 0)));
        assert_eq!(reversed.next_frame(1000.0), FrameState::Completed);
        assert_eq!(sprite.position(), Some(Point2i::new(0, 0)));
    }

    #[test]
    fn test_double_reverse_is_forward() {
        let sprite = Rc::new(Sprite::new(Point2i::zero(), Size2i::new(128, 128)));
        let scale = ScaleByAction::new(&sprite, Size2f::uniform(2.0), 1.0).unwrap();
        let mut twice = ReversedAction::new(ReversedAction::new(scale.boxed()).boxed());

        twice.next_frame(1000.0);
        assert_eq!(sprite.size(), Some(Size2i::new(256, 256)));
    }

    #[test]
    fn test_reversed_sequence() {
        let sprite = Rc::new(Sprite::new(Point2i::zero(), Size2i::new(8, 8)));
        let seq = SequenceAction::new(vec![
            MoveByAction::new(&sprite, Point2i::new(10, 0), 0.1).unwrap().boxed(),
            MoveByAction::new(&sprite, Point2i::new(0, 10), 0.1).unwrap().boxed(),
        ])
        .unwrap();
        let mut reversed = ReversedAction::new(seq.boxed());

        assert_eq!(reversed.next_frame(100.0), FrameState::Playing);
        assert_eq!(reversed.next_frame(100.0), FrameState::Completed);
        assert_eq!(sprite.position(), Some(Point2i::new(-10, -10)));
    }

    #[test]
    fn test_reversed_speed_keeps_child_in_sync() {
        let sprite = Rc::new(Sprite::default());
        let move_by = MoveByAction::new(&sprite, Point2i::new(10, 0), 1.0).unwrap();
        let mut reversed = ReversedAction::new(move_by.boxed());

        reversed.set_speed(-1.0);
        assert_eq!(reversed.speed(), 1.0);
        reversed.set_speed(2.0);
        assert_eq!(reversed.next_frame(500.0), FrameState::Completed);
        assert_eq!(sprite.position(), Some(Point2i::new(-10, 0)));
    }

    #[test]
    fn test_reversed_pause_propagates() {
        let sprite = Rc::new(Sprite::default());
        let move_by = MoveByAction::new(&sprite, Point2i::new(10, 0), 1.0).unwrap();
        let mut reversed = ReversedAction::new(move_by.boxed());

        reversed.pause();
        assert_eq!(reversed.next_frame(500.0), FrameState::Paused);
        reversed.resume();
        assert_eq!(reversed.next_frame(500.0), FrameState::Playing);
    }
}
