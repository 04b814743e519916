//! # Fade 动作
//!
//! 透明度变化：按增量淡化（`FadeAlphaBy`），以及淡入 / 淡出。

use super::{ActionSettings, FrameDirection, FrameState, Timeline, interpolate, step_leaf};
use crate::error::{ActionResult, duration_ms};
use crate::math::clamp_channel;
use crate::target::TargetRef;

/// 透明度变化方式
#[derive(Debug, Clone, Copy, PartialEq)]
enum AlphaChange {
    /// 按增量变化，反向时增量取反
    By(f32),
    /// 变化到指定透明度，反向时变化到另一端（255 ↔ 0）
    To(u8),
}

impl AlphaChange {
    /// 相对于起始值的总变化量
    fn change(self, b: f32, direction: FrameDirection) -> f32 {
        match (self, direction) {
            (AlphaChange::By(delta), FrameDirection::Next) => delta,
            (AlphaChange::By(delta), FrameDirection::Prev) => -delta,
            (AlphaChange::To(alpha), FrameDirection::Next) => alpha as f32 - b,
            (AlphaChange::To(alpha), FrameDirection::Prev) => (255 - alpha) as f32 - b,
        }
    }
}

/// 透明度动作
///
/// 每帧结果四舍五入、取绝对值并收敛到 `0..=255`。
#[derive(Debug, Clone)]
pub struct FadeAlphaByAction {
    settings: ActionSettings,
    timeline: Timeline,
    target: TargetRef,
    change: AlphaChange,
    initial: Option<u8>,
}

impl FadeAlphaByAction {
    fn with_change(target: TargetRef, change: AlphaChange, seconds: f32) -> ActionResult<Self> {
        Ok(Self {
            settings: ActionSettings::new(duration_ms(seconds)?),
            timeline: Timeline::default(),
            target,
            change,
            initial: None,
        })
    }

    /// 创建按增量淡化的动作
    ///
    /// # 参数
    /// - `target`: 目标
    /// - `delta`: 透明度增量（可为负）
    /// - `seconds`: 时长（秒）
    pub fn new(target: impl Into<TargetRef>, delta: f32, seconds: f32) -> ActionResult<Self> {
        Self::with_change(target.into(), AlphaChange::By(delta), seconds)
    }

    /// 淡入：从当前透明度变化到完全不透明
    pub fn fade_in(target: impl Into<TargetRef>, seconds: f32) -> ActionResult<Self> {
        Self::with_change(target.into(), AlphaChange::To(u8::MAX), seconds)
    }

    /// 淡出：从当前透明度变化到完全透明
    pub fn fade_out(target: impl Into<TargetRef>, seconds: f32) -> ActionResult<Self> {
        Self::with_change(target.into(), AlphaChange::To(u8::MIN), seconds)
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        let change = self.change;
        let settings = &self.settings;

        step_leaf(
            settings,
            &mut self.timeline,
            &self.target,
            &mut self.initial,
            delta_ms,
            |obj| obj.alpha(),
            |obj, b, elapsed| {
                let b = b as f32;
                let alpha = interpolate(settings, elapsed, b, change.change(b, direction));
                obj.set_alpha(clamp_channel(alpha.abs()))
            },
        )
    }
}

impl_leaf_action!(FadeAlphaByAction, set_alpha);
