//! # MoveBy 动作
//!
//! 在给定时长内把目标位置平移 `delta`。

use super::{ActionSettings, FrameDirection, FrameState, Timeline, interpolate, step_leaf};
use crate::error::{ActionResult, duration_ms};
use crate::math::Point2i;
use crate::target::TargetRef;

/// 平移动作
///
/// 正向：`position = initial + delta`；反向：`position = initial - delta`。
/// 每帧的坐标四舍五入到整数。
#[derive(Debug, Clone)]
pub struct MoveByAction {
    settings: ActionSettings,
    timeline: Timeline,
    target: TargetRef,
    delta: Point2i,
    initial: Option<Point2i>,
}

impl MoveByAction {
    /// 创建平移动作
    ///
    /// # 参数
    /// - `target`: 目标
    /// - `delta`: 总位移
    /// - `seconds`: 时长（秒）
    pub fn new(target: impl Into<TargetRef>, delta: Point2i, seconds: f32) -> ActionResult<Self> {
        Ok(Self {
            settings: ActionSettings::new(duration_ms(seconds)?),
            timeline: Timeline::default(),
            target: target.into(),
            delta,
            initial: None,
        })
    }

    /// 总位移
    pub fn delta(&self) -> Point2i {
        self.delta
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        let delta = match direction {
            FrameDirection::Next => self.delta,
            FrameDirection::Prev => -self.delta,
        };
        let settings = &self.settings;

        step_leaf(
            settings,
            &mut self.timeline,
            &self.target,
            &mut self.initial,
            delta_ms,
            |obj| obj.position(),
            |obj, b, elapsed| {
                let x = interpolate(settings, elapsed, b.x as f32, delta.x as f32);
                let y = interpolate(settings, elapsed, b.y as f32, delta.y as f32);
                obj.set_position(Point2i::new(x as i32, y as i32))
            },
        )
    }
}

impl_leaf_action!(MoveByAction, set_position);
