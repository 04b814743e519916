//! # Colorize 动作
//!
//! 把目标颜色的 RGB 通道混合到指定颜色。

use super::{ActionSettings, FrameDirection, FrameState, Timeline, interpolate, step_leaf};
use crate::error::{ActionResult, duration_ms};
use crate::math::{Color4i, clamp_channel};
use crate::target::TargetRef;

/// 着色动作
///
/// 正向从起始颜色混合到 `color`；反向施加相反的变化量。
/// 每个通道收敛到 `0..=255`，透明度通道保持不变。
#[derive(Debug, Clone)]
pub struct ColorizeAction {
    settings: ActionSettings,
    timeline: Timeline,
    target: TargetRef,
    color: Color4i,
    initial: Option<Color4i>,
}

impl ColorizeAction {
    /// 创建着色动作
    ///
    /// # 参数
    /// - `target`: 目标
    /// - `color`: 目标颜色（只使用 RGB）
    /// - `seconds`: 时长（秒）
    pub fn new(target: impl Into<TargetRef>, color: Color4i, seconds: f32) -> ActionResult<Self> {
        Ok(Self {
            settings: ActionSettings::new(duration_ms(seconds)?),
            timeline: Timeline::default(),
            target: target.into(),
            color,
            initial: None,
        })
    }

    /// 目标颜色
    pub fn color(&self) -> Color4i {
        self.color
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        let color = self.color;
        let settings = &self.settings;
        let channel = move |elapsed: f32, from: u8, to: u8| {
            let b = from as f32;
            let c = match direction {
                FrameDirection::Next => to as f32 - b,
                FrameDirection::Prev => b - to as f32,
            };
            clamp_channel(interpolate(settings, elapsed, b, c))
        };

        step_leaf(
            settings,
            &mut self.timeline,
            &self.target,
            &mut self.initial,
            delta_ms,
            |obj| obj.color(),
            |obj, b, elapsed| {
                obj.set_color(Color4i::new(
                    channel(elapsed, b.r, color.r),
                    channel(elapsed, b.g, color.g),
                    channel(elapsed, b.b, color.b),
                    b.a,
                ))
            },
        )
    }
}

impl_leaf_action!(ColorizeAction, set_color);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionObject;
    use crate::target::{Animatable, Sprite};
    use std::rc::Rc;

    fn sprite_colored(color: Color4i) -> Rc<Sprite> {
        Rc::new(Sprite::default().with_color(color))
    }

    #[test]
    fn test_colorize_blends_rgb_keeps_alpha() {
        let sprite = sprite_colored(Color4i::new(0, 100, 200, 77));
        let mut action = ColorizeAction::new(&sprite, Color4i::rgb(200, 100, 0), 1.0).unwrap();

        assert_eq!(action.next_frame(500.0), FrameState::Playing);
        assert_eq!(sprite.color(), Some(Color4i::new(100, 100, 100, 77)));

        assert_eq!(action.next_frame(500.0), FrameState::Completed);
        assert_eq!(sprite.color(), Some(Color4i::new(200, 100, 0, 77)));
    }

    #[test]
    fn test_colorize_reverse_clamps() {
        let sprite = sprite_colored(Color4i::rgb(100, 100, 100));
        let mut action = ColorizeAction::new(&sprite, Color4i::rgb(255, 0, 150), 1.0).unwrap();

        action.prev_frame(1000.0);
        // 100 - 155 → 0，100 + 100 → 200，100 - 50 → 50
        assert_eq!(sprite.color(), Some(Color4i::rgb(0, 200, 50)));
    }

    #[test]
    fn test_colorize_rewind() {
        let start = Color4i::rgb(10, 20, 30);
        let sprite = sprite_colored(start);
        let mut action = ColorizeAction::new(&sprite, Color4i::WHITE, 2.0).unwrap();

        action.next_frame(1000.0);
        assert_ne!(sprite.color(), Some(start));
        action.rewind();
        assert_eq!(sprite.color(), Some(start));
    }
}
