//! # Action 模块
//!
//! 动作（Action）是对一个目标在一段时间内的属性变化的描述，
//! 可以嵌套组合成复杂的动画。
//!
//! ## 核心概念
//!
//! - `ActionObject`: 所有动作的公共接口（逐帧推进、暂停、倒带、克隆）
//! - `ActionSettings`: 名字、时长、速度、时间曲线
//! - `ActionPhase`: 单个动作的生命周期
//! - `FrameState`: 每一帧推进后的返回状态
//!
//! ## 动作种类
//!
//! - 叶子动作：[`MoveByAction`]、[`ScaleByAction`]、[`FadeAlphaByAction`]、
//!   [`FadeAudioGainByAction`]、
//!   [`ColorizeAction`]、[`AnimateTexturesAction`]、[`WaitForDurationAction`]、
//!   [`CallbackAction`]
//! - 组合动作：[`GroupAction`]、[`SequenceAction`]、[`RepeatForAction`]、
//!   [`RepeatForeverAction`]、[`ReversedAction`]
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let sprite = Rc::new(Sprite::new(Point2i::new(0, 0), Size2i::new(128, 128)));
//!
//! let action = SequenceAction::new(vec![
//!     MoveByAction::new(&sprite, Point2i::new(200, 0), 2.5)?.boxed(),
//!     FadeAlphaByAction::fade_out(&sprite, 1.0)?.boxed(),
//! ])?;
//!
//! let mut player = ActionPlayer::new();
//! player.run_action(&action)?;
//! while player.update(16.0) {}
//! ```

/// 为叶子动作实现 `ActionObject`
///
/// 要求类型实现 `Clone`，带有 `settings`、`timeline`、`target`、`initial` 字段
/// 和 `step(direction, delta_ms)` 方法。`$restore` 是倒带时写回起始值的 setter。
macro_rules! impl_leaf_action {
    ($ty:ty, $restore:ident) => {
        impl $crate::action::ActionObject for $ty {
            fn settings(&self) -> &$crate::action::ActionSettings {
                &self.settings
            }

            fn settings_mut(&mut self) -> &mut $crate::action::ActionSettings {
                &mut self.settings
            }

            fn phase(&self) -> $crate::action::ActionPhase {
                self.timeline.phase
            }

            fn is_paused(&self) -> bool {
                self.timeline.paused
            }

            fn next_frame(&mut self, delta_ms: f32) -> $crate::action::FrameState {
                self.step($crate::action::FrameDirection::Next, delta_ms)
            }

            fn prev_frame(&mut self, delta_ms: f32) -> $crate::action::FrameState {
                self.step($crate::action::FrameDirection::Prev, delta_ms)
            }

            fn pause(&mut self) {
                self.timeline.paused = true;
            }

            fn resume(&mut self) {
                self.timeline.paused = false;
            }

            fn rewind(&mut self) {
                $crate::action::rewind_leaf(
                    &mut self.timeline,
                    &self.target,
                    &mut self.initial,
                    |obj, b| {
                        obj.$restore(b);
                    },
                );
            }

            fn release(&mut self) {
                self.target.release();
            }

            fn clone_action(&self) -> Box<dyn $crate::action::ActionObject> {
                let mut copy = self.clone();
                copy.timeline.reset();
                copy.initial = None;
                Box::new(copy)
            }
        }
    };
}

mod animate_textures;
mod callback;
mod colorize;
mod fade;
mod fade_gain;
mod group;
mod move_by;
mod repeat;
mod reversed;
mod scale_by;
mod sequence;
mod wait;

pub use animate_textures::AnimateTexturesAction;
pub use callback::CallbackAction;
pub use colorize::ColorizeAction;
pub use fade::FadeAlphaByAction;
pub use fade_gain::FadeAudioGainByAction;
pub use group::GroupAction;
pub use move_by::MoveByAction;
pub use repeat::{RepeatForAction, RepeatForeverAction};
pub use reversed::ReversedAction;
pub use scale_by::ScaleByAction;
pub use sequence::SequenceAction;
pub use wait::WaitForDurationAction;

use std::fmt;

use tracing::{debug, trace, warn};

use crate::error::{ActionError, ActionResult};
use crate::target::{Animatable, TargetRef};
use crate::timing::TimingCurve;

/// 每一帧推进后的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// 仍在播放
    Playing,
    /// 已暂停
    Paused,
    /// 已完成
    Completed,
}

/// 动作的生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ActionPhase {
    /// 尚未推进过
    #[default]
    NotStarted,
    /// 第一帧（已记录起始值）
    FirstFrame,
    /// 播放中
    InProgress,
    /// 写入最终值的那一帧
    LastFrame,
    /// 已结束
    Done,
}

impl ActionPhase {
    /// 是否已经播放完毕
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::LastFrame | Self::Done)
    }
}

/// 推进方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDirection {
    /// 正向（`next_frame`）
    Next,
    /// 反向（`prev_frame`）
    Prev,
}

impl FrameDirection {
    /// 反转方向
    pub fn flip(self) -> Self {
        match self {
            Self::Next => Self::Prev,
            Self::Prev => Self::Next,
        }
    }
}

/// 动作的公共设置
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSettings {
    /// 名字（可为空）
    pub name: String,
    /// 时长（毫秒）
    pub duration: f32,
    /// 速度倍率（>= 0）
    pub speed: f32,
    /// 时间曲线
    pub timing_curve: TimingCurve,
}

impl ActionSettings {
    /// 创建设置
    ///
    /// # 参数
    /// - `duration`: 时长（毫秒）
    pub fn new(duration: f32) -> Self {
        Self {
            name: String::new(),
            duration,
            speed: 1.0,
            timing_curve: TimingCurve::default(),
        }
    }
}

/// 校验速度倍率
pub(crate) fn checked_speed(speed: f32) -> ActionResult<f32> {
    if !speed.is_finite() || speed < 0.0 {
        return Err(ActionError::InvalidSpeed { speed });
    }
    Ok(speed)
}

/// 校验并写入速度倍率，非法值打印警告后忽略
///
/// # 返回
/// 是否写入成功（组合动作据此决定是否转发给子动作）
pub(crate) fn apply_speed(settings: &mut ActionSettings, speed: f32) -> bool {
    match checked_speed(speed) {
        Ok(speed) => {
            settings.speed = speed;
            true
        }
        Err(e) => {
            warn!(action = %settings.name, error = %e, "忽略非法速度");
            false
        }
    }
}

/// 动作接口
///
/// 叶子动作直接修改目标属性；组合动作拥有子动作并转发调用。
/// 所有时间参数都以毫秒为单位。
pub trait ActionObject: fmt::Debug {
    /// 公共设置
    fn settings(&self) -> &ActionSettings;

    /// 公共设置（可变）
    fn settings_mut(&mut self) -> &mut ActionSettings;

    /// 当前生命周期阶段
    fn phase(&self) -> ActionPhase;

    /// 是否处于暂停状态
    fn is_paused(&self) -> bool;

    /// 正向推进一帧
    fn next_frame(&mut self, delta_ms: f32) -> FrameState;

    /// 反向推进一帧（施加相反的变化）
    fn prev_frame(&mut self, delta_ms: f32) -> FrameState;

    /// 暂停（不影响已记录的起始值）
    fn pause(&mut self);

    /// 恢复
    fn resume(&mut self);

    /// 倒带：清零进度，把目标恢复到起始值
    fn rewind(&mut self);

    /// 丢弃目标引用
    fn release(&mut self);

    /// 深拷贝，得到一个尚未开始的独立副本
    fn clone_action(&self) -> Box<dyn ActionObject>;

    fn name(&self) -> &str {
        &self.settings().name
    }

    fn set_name(&mut self, name: &str) {
        self.settings_mut().name = name.to_string();
    }

    /// 时长（毫秒）
    fn duration(&self) -> f32 {
        self.settings().duration
    }

    fn speed(&self) -> f32 {
        self.settings().speed
    }

    /// 设置速度倍率，非法值被忽略
    fn set_speed(&mut self, speed: f32) {
        apply_speed(self.settings_mut(), speed);
    }

    fn timing_curve(&self) -> TimingCurve {
        self.settings().timing_curve
    }

    fn set_timing_curve(&mut self, curve: TimingCurve) {
        self.settings_mut().timing_curve = curve;
    }

    /// 按方向推进一帧
    fn frame(&mut self, direction: FrameDirection, delta_ms: f32) -> FrameState {
        match direction {
            FrameDirection::Next => self.next_frame(delta_ms),
            FrameDirection::Prev => self.prev_frame(delta_ms),
        }
    }

    /// 设置名字
    fn with_name(mut self, name: &str) -> Self
    where
        Self: Sized,
    {
        self.set_name(name);
        self
    }

    /// 设置速度倍率
    fn with_speed(mut self, speed: f32) -> ActionResult<Self>
    where
        Self: Sized,
    {
        let speed = checked_speed(speed)?;
        self.set_speed(speed);
        Ok(self)
    }

    /// 设置时间曲线
    fn with_timing_curve(mut self, curve: TimingCurve) -> Self
    where
        Self: Sized,
    {
        self.set_timing_curve(curve);
        self
    }

    /// 装箱
    fn boxed(self) -> Box<dyn ActionObject>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// 把具体动作装箱成 `Box<dyn ActionObject>`
pub fn create_action<A: ActionObject + 'static>(action: A) -> Box<dyn ActionObject> {
    Box::new(action)
}

/// 动作的运行状态
///
/// 叶子动作和组合动作共用：已经过的时间、生命周期阶段、暂停标记。
#[derive(Debug, Clone, Default)]
pub(crate) struct Timeline {
    /// 已经过的时间（毫秒，已乘速度）
    pub elapsed: f32,
    pub phase: ActionPhase,
    pub paused: bool,
    /// 已推进的帧数（诊断用）
    pub frames: u64,
}

impl Timeline {
    /// 帧入口检查
    ///
    /// 已结束返回 `Completed`，暂停返回 `Paused`，否则返回 `None` 继续推进。
    pub fn gate(&mut self) -> Option<FrameState> {
        match self.phase {
            ActionPhase::LastFrame => {
                self.phase = ActionPhase::Done;
                Some(FrameState::Completed)
            }
            ActionPhase::Done => Some(FrameState::Completed),
            _ if self.paused => Some(FrameState::Paused),
            _ => None,
        }
    }

    /// 进入新的一帧，返回是否为第一帧
    pub fn enter(&mut self) -> bool {
        self.frames += 1;
        if self.phase == ActionPhase::NotStarted {
            self.phase = ActionPhase::FirstFrame;
            true
        } else {
            self.phase = ActionPhase::InProgress;
            false
        }
    }

    /// 累加时间，截断到 `duration`
    pub fn advance(&mut self, delta_ms: f32, speed: f32, duration: f32) -> f32 {
        self.elapsed = (self.elapsed + delta_ms.max(0.0) * speed).min(duration);
        self.elapsed
    }

    /// 本帧写入了最终值
    pub fn finish(&mut self) -> FrameState {
        self.phase = ActionPhase::LastFrame;
        FrameState::Completed
    }

    /// 无法继续（目标失效等），直接结束
    pub fn abort(&mut self) -> FrameState {
        self.phase = ActionPhase::Done;
        FrameState::Completed
    }

    /// 回到初始状态
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 叶子动作的单帧逻辑
///
/// 依次处理：入口检查、目标存活检查、首帧记录起始值、累加时间、写入目标、完成判定。
///
/// # 参数
/// - `capture`: 从目标读取起始值；属性不存在时返回 `None`
/// - `apply`: 根据起始值与已经过时间写入目标；返回 `false` 表示写入失败
pub(crate) fn step_leaf<B: Copy + fmt::Debug>(
    settings: &ActionSettings,
    timeline: &mut Timeline,
    target: &TargetRef,
    baseline: &mut Option<B>,
    delta_ms: f32,
    capture: impl FnOnce(&dyn Animatable) -> Option<B>,
    apply: impl FnOnce(&dyn Animatable, B, f32) -> bool,
) -> FrameState {
    if let Some(state) = timeline.gate() {
        return state;
    }

    let Some(obj) = target.upgrade() else {
        debug!(action = %settings.name, "目标已失效，动作结束");
        return timeline.abort();
    };

    let first = timeline.enter();
    let b = match *baseline {
        Some(b) if !first => b,
        _ => match capture(&*obj) {
            Some(b) => {
                debug!(action = %settings.name, initial = ?b, "动作开始");
                *baseline = Some(b);
                b
            }
            None => {
                debug!(action = %settings.name, "目标缺少该属性，动作结束");
                return timeline.abort();
            }
        },
    };

    let elapsed = timeline.advance(delta_ms, settings.speed, settings.duration);
    if !apply(&*obj, b, elapsed) {
        debug!(action = %settings.name, "写入目标失败，动作结束");
        return timeline.abort();
    }
    trace!(
        action = %settings.name,
        elapsed = elapsed,
        frames = timeline.frames,
        "动作推进"
    );

    if elapsed >= settings.duration {
        debug!(action = %settings.name, frames = timeline.frames, "动作完成");
        timeline.finish()
    } else {
        FrameState::Playing
    }
}

/// 只计时、不修改目标的单帧逻辑
pub(crate) fn step_timer(
    settings: &ActionSettings,
    timeline: &mut Timeline,
    delta_ms: f32,
) -> FrameState {
    if let Some(state) = timeline.gate() {
        return state;
    }
    if timeline.enter() {
        debug!(action = %settings.name, duration = settings.duration, "计时开始");
    }

    let elapsed = timeline.advance(delta_ms, settings.speed, settings.duration);
    if elapsed >= settings.duration {
        debug!(action = %settings.name, "计时结束");
        timeline.finish()
    } else {
        FrameState::Playing
    }
}

/// 叶子动作的倒带：目标恢复到起始值，起始值在下一帧重新记录
pub(crate) fn rewind_leaf<B: Copy>(
    timeline: &mut Timeline,
    target: &TargetRef,
    baseline: &mut Option<B>,
    restore: impl FnOnce(&dyn Animatable, B),
) {
    if let (Some(b), Some(obj)) = (baseline.take(), target.upgrade()) {
        restore(&*obj, b);
    }
    timeline.reset();
}

/// 按曲线插值并四舍五入
pub(crate) fn interpolate(settings: &ActionSettings, elapsed: f32, b: f32, c: f32) -> f32 {
    settings
        .timing_curve
        .value(elapsed, b, c, settings.duration)
        .round()
}
