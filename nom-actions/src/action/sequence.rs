//! # Sequence 动作
//!
//! 依次播放子动作。

use tracing::debug;

use super::{
    ActionObject, ActionPhase, ActionSettings, FrameDirection, FrameState, Timeline, apply_speed,
};
use crate::error::{ActionError, ActionResult};
use crate::timing::TimingCurve;

/// 顺序组合动作
///
/// 前一个子动作完成后，下一个子动作在下一次推进时才开始，
/// 并在那时记录自己的起始值。
#[derive(Debug)]
pub struct SequenceAction {
    settings: ActionSettings,
    timeline: Timeline,
    actions: Vec<Box<dyn ActionObject>>,
    /// 当前播放的子动作序号
    cursor: usize,
}

impl SequenceAction {
    /// 创建顺序组合动作
    ///
    /// 时长为所有子动作时长之和。子动作列表不能为空。
    pub fn new(actions: Vec<Box<dyn ActionObject>>) -> ActionResult<Self> {
        if actions.is_empty() {
            return Err(ActionError::EmptyComposite {
                kind: "SequenceAction",
            });
        }
        let duration = actions.iter().map(|a| a.duration()).sum();

        Ok(Self {
            settings: ActionSettings::new(duration),
            timeline: Timeline::default(),
            actions,
            cursor: 0,
        })
    }

    /// 子动作
    pub fn actions(&self) -> &[Box<dyn ActionObject>] {
        &self.actions
    }

    /// 已完成的子动作数量
    pub fn num_completed(&self) -> usize {
        self.cursor
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        if let Some(state) = self.timeline.gate() {
            return state;
        }
        if self.timeline.enter() {
            debug!(action = %self.settings.name, children = self.actions.len(), "顺序动作开始");
        }

        let Some(current) = self.actions.get_mut(self.cursor) else {
            return self.timeline.finish();
        };
        if current.frame(direction, delta_ms) == FrameState::Completed {
            self.cursor += 1;
            debug!(
                action = %self.settings.name,
                completed = self.cursor,
                total = self.actions.len(),
                "子动作完成"
            );
        }

        if self.cursor >= self.actions.len() {
            debug!(action = %self.settings.name, "顺序动作完成");
            self.timeline.finish()
        } else {
            FrameState::Playing
        }
    }
}

impl ActionObject for SequenceAction {
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
        // 逆序倒带，目标最终回到第一个子动作的起始值
        self.actions.iter_mut().rev().for_each(|a| a.rewind());
        self.cursor = 0;
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
            cursor: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MoveByAction, WaitForDurationAction};
    use crate::math::{Point2i, Size2i};
    use crate::target::{Animatable, Sprite};
    use std::rc::Rc;

    fn sprite() -> Rc<Sprite> {
        Rc::new(Sprite::new(Point2i::zero(), Size2i::new(32, 32)))
    }

    #[test]
    fn test_sequence_rejects_empty() {
        assert!(SequenceAction::new(Vec::new()).is_err());
    }

    #[test]
    fn test_sequence_runs_in_order_with_lazy_baselines() {
        let sprite = sprite();
        let mut seq = SequenceAction::new(vec![
            MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap().boxed(),
            WaitForDurationAction::new(0.5).unwrap().boxed(),
            MoveByAction::new(&sprite, Point2i::new(0, 50), 1.0).unwrap().boxed(),
        ])
        .unwrap();
        assert_eq!(seq.duration(), 2500.0);

        assert_eq!(seq.next_frame(1000.0), FrameState::Playing);
        assert_eq!(seq.num_completed(), 1);
        assert_eq!(sprite.position(), Some(Point2i::new(100, 0)));

        // 等待期间被外部移动，第二段位移从新位置开始
        sprite.set_position(Point2i::new(300, 0));
        assert_eq!(seq.next_frame(500.0), FrameState::Playing);
        assert_eq!(seq.num_completed(), 2);

        assert_eq!(seq.next_frame(500.0), FrameState::Playing);
        assert_eq!(sprite.position(), Some(Point2i::new(300, 25)));
        assert_eq!(seq.next_frame(500.0), FrameState::Completed);
        assert_eq!(sprite.position(), Some(Point2i::new(300, 50)));
    }

    #[test]
    fn test_sequence_rewind_restores_first_baseline() {
        let sprite = sprite();
        let mut seq = SequenceAction::new(vec![
            MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap().boxed(),
            MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap().boxed(),
        ])
        .unwrap();

        seq.next_frame(1000.0);
        seq.next_frame(500.0);
        assert_eq!(sprite.position(), Some(Point2i::new(150, 0)));

        seq.rewind();
        assert_eq!(sprite.position(), Some(Point2i::zero()));
        assert_eq!(seq.phase(), ActionPhase::NotStarted);
        assert_eq!(seq.num_completed(), 0);
    }

    #[test]
    fn test_sequence_clone_is_independent() {
        let sprite = sprite();
        let mut seq = SequenceAction::new(vec![
            MoveByAction::new(&sprite, Point2i::new(10, 0), 0.1).unwrap().boxed(),
        ])
        .unwrap();

        let mut copy = seq.clone_action();
        assert_eq!(copy.next_frame(100.0), FrameState::Completed);
        assert_eq!(seq.phase(), ActionPhase::NotStarted);
        assert_eq!(seq.next_frame(100.0), FrameState::Completed);
        assert_eq!(sprite.position(), Some(Point2i::new(20, 0)));
    }
}
