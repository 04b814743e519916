//! # Nom Actions
//!
//! 基于时间的动作（动画）系统。
//!
//! ## 架构概述
//!
//! `nom-actions` 不依赖任何渲染引擎。动作通过 [`Animatable`] trait
//! 读写目标属性，由宿主每帧调用 [`ActionPlayer::update`] 推进：
//!
//! ```text
//! Host                          ActionPlayer
//!   │                              │
//!   │──── run_action(&action) ───►│ clone + 入队
//!   │                              │
//!   │──── update(delta_ms) ──────►│ next_frame → Animatable::set_*
//!   │◄─── 是否还有动作 ────────────│
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`ActionObject`]：所有动作的公共接口
//! - [`TimingCurve`]：时间曲线（缓动函数）
//! - [`ActionPlayer`]：顶层调度器
//! - [`Animatable`]：动作的目标
//!
//! ## 使用示例
//!
//! ```ignore
//! use nom_actions::*;
//!
//! let sprite = Rc::new(Sprite::new(Point2i::new(0, 0), Size2i::new(128, 128)));
//!
//! let action = GroupAction::new(vec![
//!     MoveByAction::new(&sprite, Point2i::new(200, 0), 2.5)?.boxed(),
//!     FadeAlphaByAction::fade_in(&sprite, 2.5)?
//!         .with_timing_curve("quad_ease_out".parse()?)
//!         .boxed(),
//! ])?;
//!
//! let mut player = ActionPlayer::new();
//! player.run_action_with(&action, || println!("完成"))?;
//! while player.update(16.0) {}
//! ```
//!
//! ## 模块结构
//!
//! - [`timing`]：时间曲线
//! - [`action`]：叶子动作与组合动作
//! - [`player`]：动作播放器
//! - [`target`]：目标 trait、示例精灵与音频源
//! - [`config`]：播放器配置
//! - [`error`]：错误类型定义

pub mod action;
pub mod config;
pub mod error;
pub mod math;
pub mod player;
pub mod target;
pub mod timing;

// 重导出核心类型
pub use action::{
    ActionObject, ActionPhase, ActionSettings, AnimateTexturesAction, CallbackAction,
    ColorizeAction, FadeAlphaByAction, FadeAudioGainByAction, FrameDirection, FrameState,
    GroupAction, MoveByAction, RepeatForAction, RepeatForeverAction, ReversedAction,
    ScaleByAction, SequenceAction, WaitForDurationAction, create_action,
};
pub use config::PlayerConfig;
pub use error::{ActionError, ActionResult, ConfigError};
pub use math::{Color4i, Point2i, Size2f, Size2i};
pub use player::{ActionPlayer, PlayerState};
pub use target::{Animatable, MAX_GAIN, Sound, Sprite, SpriteData, TargetRef};
pub use timing::{CurveFamily, Easing, TimingCurve, TimingFn};
