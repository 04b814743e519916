//! # AnimateTextures 动作
//!
//! 逐帧切换目标的纹理帧（翻页动画）。

use super::{ActionSettings, FrameDirection, FrameState, Timeline, step_leaf};
use crate::error::{ActionError, ActionResult, duration_ms};
use crate::target::TargetRef;

/// 翻页动作
///
/// 每隔 `frame_interval` 切换到下一帧，总时长为 `frame_interval × 帧数`。
/// 反向播放时从最后一帧往前切换。
#[derive(Debug, Clone)]
pub struct AnimateTexturesAction {
    settings: ActionSettings,
    timeline: Timeline,
    target: TargetRef,
    frames: Vec<usize>,
    /// 切换之前目标所在的帧，倒带时恢复
    initial: Option<usize>,
}

impl AnimateTexturesAction {
    /// 创建翻页动作
    ///
    /// # 参数
    /// - `target`: 目标
    /// - `frames`: 依次显示的纹理帧编号（不能为空）
    /// - `frame_interval_seconds`: 每帧停留时间（秒）
    pub fn new(
        target: impl Into<TargetRef>,
        frames: Vec<usize>,
        frame_interval_seconds: f32,
    ) -> ActionResult<Self> {
        if frames.is_empty() {
            return Err(ActionError::NoFrames);
        }
        let interval = duration_ms(frame_interval_seconds)?;
        let duration = interval * frames.len() as f32;

        Ok(Self {
            settings: ActionSettings::new(duration),
            timeline: Timeline::default(),
            target: target.into(),
            frames,
            initial: None,
        })
    }

    /// 纹理帧列表
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    /// 每帧停留时间（毫秒）
    pub fn frame_interval(&self) -> f32 {
        self.settings.duration / self.frames.len() as f32
    }

    /// 已经过时间对应的帧序号
    fn frame_index(settings: &ActionSettings, count: usize, elapsed: f32) -> usize {
        let position = settings
            .timing_curve
            .value(elapsed, 0.0, count as f32, settings.duration)
            .floor();
        (position.max(0.0) as usize).min(count - 1)
    }

    fn step(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        let settings = &self.settings;
        let frames = &self.frames;

        step_leaf(
            settings,
            &mut self.timeline,
            &self.target,
            &mut self.initial,
            delta_ms,
            |obj| obj.frame(),
            |obj, _, elapsed| {
                let index = Self::frame_index(settings, frames.len(), elapsed);
                let index = match direction {
                    FrameDirection::Next => index,
                    FrameDirection::Prev => frames.len() - 1 - index,
                };
                obj.set_frame(frames[index])
            },
        )
    }
}

impl_leaf_action!(AnimateTexturesAction, set_frame);
