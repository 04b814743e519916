//! # ScaleBy 动作
//!
//! 在给定时长内按比例缩放目标尺寸。

use super::{ActionSettings, FrameDirection, FrameState, Timeline, interpolate, step_leaf};
use crate::error::{ActionResult, duration_ms};
use crate::math::{Size2f, Size2i};
use crate::target::TargetRef;

/// 缩放动作
///
/// 每个轴独立计算变化量：`b * f - b` 为正时放大，否则按 `b / f` 缩小，
/// 所以负的缩放因子表示除法（128 按 -3 缩放得到 43）。
/// 每帧结果四舍五入后取绝对值。反向播放时缩放因子取反。
#[derive(Debug, Clone)]
pub struct ScaleByAction {
    settings: ActionSettings,
    timeline: Timeline,
    target: TargetRef,
    factor: Size2f,
    initial: Option<Size2i>,
}

/// 单轴的总变化量
///
/// 缩放因子为 0 时尺寸收敛到 0。
fn scale_change(b: f32, factor: f32) -> f32 {
    if factor == 0.0 {
        return -b;
    }
    let grow = b * factor - b;
    if grow > 0.0 { grow } else { -(b / factor) - b }
}

impl ScaleByAction {
    /// 创建缩放动作
    ///
    /// # 参数
    /// - `target`: 目标
    /// - `factor`: 缩放因子（宽、高）
    /// - `seconds`: 时长（秒）
    pub fn new(target: impl Into<TargetRef>, factor: Size2f, seconds: f32) -> ActionResult<Self> {
        Ok(Self {
            settings: ActionSettings::new(duration_ms(seconds)?),
            timeline: Timeline::default(),
            target: target.into(),
            factor,
            initial: None,
        })
    }

    /// 缩放因子
    pub fn factor(&self) -> Size2f {
        self.factor
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        let factor = match direction {
            FrameDirection::Next => self.factor,
            FrameDirection::Prev => -self.factor,
        };
        let settings = &self.settings;

        step_leaf(
            settings,
            &mut self.timeline,
            &self.target,
            &mut self.initial,
            delta_ms,
            |obj| obj.size(),
            |obj, b, elapsed| {
                let (bw, bh) = (b.w as f32, b.h as f32);
                let w = interpolate(settings, elapsed, bw, scale_change(bw, factor.w));
                let h = interpolate(settings, elapsed, bh, scale_change(bh, factor.h));
                obj.set_size(Size2i::new(w.abs() as i32, h.abs() as i32))
            },
        )
    }
}

impl_leaf_action!(ScaleByAction, set_size);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionObject;
    use crate::math::Point2i;
    use crate::target::{Animatable, Sprite};
    use std::rc::Rc;

    fn sprite_sized(w: i32, h: i32) -> Rc<Sprite> {
        Rc::new(Sprite::new(Point2i::zero(), Size2i::new(w, h)))
    }

    #[test]
    fn test_scale_change() {
        assert_eq!(scale_change(128.0, 2.0), 128.0);
        // 负因子表示除法：128 / 3 ≈ 42.67
        assert!((128.0 + scale_change(128.0, -3.0) - 42.666_668).abs() < 1e-3);
        assert_eq!(scale_change(50.0, 0.0), -50.0);
    }

    #[test]
    fn test_scale_by_negative_factor_divides() {
        let sprite = sprite_sized(128, 128);
        let mut action = ScaleByAction::new(&sprite, Size2f::new(-3.0, -3.0), 1.5).unwrap();

        while action.next_frame(100.0) != FrameState::Completed {}
        assert_eq!(sprite.size(), Some(Size2i::new(43, 43)));
    }

    #[test]
    fn test_scale_by_grow() {
        let sprite = sprite_sized(128, 64);
        let mut action = ScaleByAction::new(&sprite, Size2f::new(2.0, 3.0), 1.0).unwrap();

        assert_eq!(action.next_frame(500.0), FrameState::Playing);
        assert_eq!(sprite.size(), Some(Size2i::new(192, 128)));
        assert_eq!(action.next_frame(500.0), FrameState::Completed);
        assert_eq!(sprite.size(), Some(Size2i::new(256, 192)));
    }

    #[test]
    fn test_scale_by_prev_frame_inverts() {
        let sprite = sprite_sized(128, 128);
        let mut action = ScaleByAction::new(&sprite, Size2f::uniform(2.0), 1.0).unwrap();

        assert_eq!(action.prev_frame(1000.0), FrameState::Completed);
        assert_eq!(sprite.size(), Some(Size2i::new(64, 64)));
    }

    #[test]
    fn test_scale_by_rewind() {
        let sprite = sprite_sized(100, 100);
        let mut action = ScaleByAction::new(&sprite, Size2f::uniform(2.0), 1.0).unwrap();

        action.next_frame(1000.0);
        assert_eq!(sprite.size(), Some(Size2i::new(200, 200)));
        action.rewind();
        assert_eq!(sprite.size(), Some(Size2i::new(100, 100)));
    }

    #[test]
    fn test_scale_by_zero_duration_completes_immediately() {
        let sprite = sprite_sized(10, 10);
        let mut action = ScaleByAction::new(&sprite, Size2f::uniform(3.0), 0.0).unwrap();

        assert_eq!(action.next_frame(0.0), FrameState::Completed);
        assert_eq!(sprite.size(), Some(Size2i::new(30, 30)));
    }
}
