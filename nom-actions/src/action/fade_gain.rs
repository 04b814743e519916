//! # FadeAudioGainBy 动作
//!
//! 音量渐变。目标需要提供 `Animatable::gain`，例如 [`Sound`](crate::target::Sound)。

use super::{ActionSettings, FrameDirection, FrameState, Timeline, interpolate, step_leaf};
use crate::error::{ActionResult, duration_ms};
use crate::target::{MAX_GAIN, TargetRef};

/// 音量渐变动作
///
/// `gain` 大于起始音量时渐变到 `gain`，否则渐变到静音。
/// 反向播放时渐变到静音。每帧结果取绝对值并收敛到 `0.0..=MAX_GAIN`。
#[derive(Debug, Clone)]
pub struct FadeAudioGainByAction {
    settings: ActionSettings,
    timeline: Timeline,
    target: TargetRef,
    gain: f32,
    initial: Option<f32>,
}

impl FadeAudioGainByAction {
    /// 创建音量渐变动作
    ///
    /// # 参数
    /// - `target`: 目标
    /// - `gain`: 目标音量（`0.0..=MAX_GAIN`）
    /// - `seconds`: 时长（秒）
    pub fn new(target: impl Into<TargetRef>, gain: f32, seconds: f32) -> ActionResult<Self> {
        Ok(Self {
            settings: ActionSettings::new(duration_ms(seconds)?),
            timeline: Timeline::default(),
            target: target.into(),
            gain,
            initial: None,
        })
    }

    /// 相对于起始音量的总变化量
    fn change(gain: f32, b: f32, direction: FrameDirection) -> f32 {
        let c = match direction {
            FrameDirection::Next => gain,
            FrameDirection::Prev => -gain,
        };
        if c > b { c - b } else { -b }
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        let gain = self.gain;
        let settings = &self.settings;

        step_leaf(
            settings,
            &mut self.timeline,
            &self.target,
            &mut self.initial,
            delta_ms,
            |obj| obj.gain(),
            |obj, b, elapsed| {
                let value = interpolate(settings, elapsed, b, Self::change(gain, b, direction));
                obj.set_gain(value.abs().min(MAX_GAIN))
            },
        )
    }
}

impl_leaf_action!(FadeAudioGainByAction, set_gain);
