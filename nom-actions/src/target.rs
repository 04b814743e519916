//! # Target 模块
//!
//! 动作目标抽象。
//!
//! ## 核心概念
//!
//! - `Animatable`: 可被动作驱动的对象接口，每个属性都是可选的
//! - `TargetRef`: 动作持有的非拥有引用（`Weak`），目标被释放后自动失效
//! - `Sprite`: 一个简单的 `Animatable` 实现
//! - `Sound`: 只有音量属性的音频源
//!
//! 目标由外部以 `Rc<T>` 持有，动作只通过 `Weak` 访问它，
//! 所以目标可以先于动作被释放。

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::math::{Color4i, Point2i, Size2i};

/// 可被动作驱动的对象接口
///
/// 所有访问器都有默认实现：getter 返回 `None`，setter 返回 `false`。
/// 对象只需覆盖自己真正拥有的属性；动作访问一个不存在的属性时，
/// 按目标已失效处理。
///
/// setter 使用 `&self`，实现方自行通过 `RefCell` 等提供内部可变性。
pub trait Animatable: 'static {
    /// 位置
    fn position(&self) -> Option<Point2i> {
        None
    }

    /// 设置位置
    fn set_position(&self, _position: Point2i) -> bool {
        false
    }

    /// 尺寸
    fn size(&self) -> Option<Size2i> {
        None
    }

    /// 设置尺寸
    fn set_size(&self, _size: Size2i) -> bool {
        false
    }

    /// 透明度（0 - 255）
    fn alpha(&self) -> Option<u8> {
        None
    }

    /// 设置透明度
    fn set_alpha(&self, _alpha: u8) -> bool {
        false
    }

    /// 颜色
    fn color(&self) -> Option<Color4i> {
        None
    }

    /// 设置颜色
    fn set_color(&self, _color: Color4i) -> bool {
        false
    }

    /// 当前纹理帧
    fn frame(&self) -> Option<usize> {
        None
    }

    /// 设置当前纹理帧
    fn set_frame(&self, _frame: usize) -> bool {
        false
    }

    /// 音量（`0.0..=MAX_GAIN`）
    fn gain(&self) -> Option<f32> {
        None
    }

    /// 设置音量
    fn set_gain(&self, _gain: f32) -> bool {
        false
    }
}

/// 最大音量
pub const MAX_GAIN: f32 = 100.0;

/// 动作目标引用
///
/// 不拥有目标。`release` 之后或目标被释放后，`upgrade` 返回 `None`。
#[derive(Clone, Default)]
pub struct TargetRef(Option<Weak<dyn Animatable>>);

impl TargetRef {
    /// 空引用（不指向任何目标）
    pub fn none() -> Self {
        Self(None)
    }

    /// 尝试取得目标
    pub fn upgrade(&self) -> Option<Rc<dyn Animatable>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    /// 目标是否仍然存活
    pub fn is_alive(&self) -> bool {
        self.upgrade().is_some()
    }

    /// 丢弃目标引用
    pub fn release(&mut self) {
        self.0 = None;
    }
}

impl<T: Animatable> From<&Rc<T>> for TargetRef {
    fn from(target: &Rc<T>) -> Self {
        let weak: Weak<T> = Rc::downgrade(target);
        let weak: Weak<dyn Animatable> = weak;
        Self(Some(weak))
    }
}

impl From<Weak<dyn Animatable>> for TargetRef {
    fn from(weak: Weak<dyn Animatable>) -> Self {
        Self(Some(weak))
    }
}

impl std::fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.0, self.is_alive()) {
            (None, _) => write!(f, "TargetRef(released)"),
            (Some(_), true) => write!(f, "TargetRef(alive)"),
            (Some(_), false) => write!(f, "TargetRef(expired)"),
        }
    }
}

/// 精灵数据
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteData {
    /// 位置
    pub position: Point2i,
    /// 尺寸
    pub size: Size2i,
    /// 颜色（`a` 即透明度）
    pub color: Color4i,
    /// 当前纹理帧
    pub frame: usize,
}

impl Default for SpriteData {
    fn default() -> Self {
        Self {
            position: Point2i::zero(),
            size: Size2i::new(0, 0),
            color: Color4i::WHITE,
            frame: 0,
        }
    }
}

/// 精灵
///
/// 实现了全部属性的 `Animatable`。
#[derive(Debug, Default)]
pub struct Sprite {
    data: RefCell<SpriteData>,
}

impl Sprite {
    /// 创建新的精灵
    pub fn new(position: Point2i, size: Size2i) -> Self {
        Self::from_data(SpriteData {
            position,
            size,
            ..SpriteData::default()
        })
    }

    /// 从现有数据创建
    pub fn from_data(data: SpriteData) -> Self {
        Self {
            data: RefCell::new(data),
        }
    }

    /// 设置初始透明度
    pub fn with_alpha(self, alpha: u8) -> Self {
        self.data.borrow_mut().color.a = alpha;
        self
    }

    /// 设置初始颜色
    pub fn with_color(self, color: Color4i) -> Self {
        self.data.borrow_mut().color = color;
        self
    }

    /// 当前数据快照
    pub fn snapshot(&self) -> SpriteData {
        self.data.borrow().clone()
    }
}

impl Animatable for Sprite {
    fn position(&self) -> Option<Point2i> {
        Some(self.data.borrow().position)
    }

    fn set_position(&self, position: Point2i) -> bool {
        self.data.borrow_mut().position = position;
        true
    }

    fn size(&self) -> Option<Size2i> {
        Some(self.data.borrow().size)
    }

    fn set_size(&self, size: Size2i) -> bool {
        self.data.borrow_mut().size = size;
        true
    }

    fn alpha(&self) -> Option<u8> {
        Some(self.data.borrow().color.a)
    }

    fn set_alpha(&self, alpha: u8) -> bool {
        self.data.borrow_mut().color.a = alpha;
        true
    }

    fn color(&self) -> Option<Color4i> {
        Some(self.data.borrow().color)
    }

    fn set_color(&self, color: Color4i) -> bool {
        self.data.borrow_mut().color = color;
        true
    }

    fn frame(&self) -> Option<usize> {
        Some(self.data.borrow().frame)
    }

    fn set_frame(&self, frame: usize) -> bool {
        self.data.borrow_mut().frame = frame;
        true
    }
}

/// 音频源
///
/// 只提供音量属性，播放由外部音频引擎负责。
#[derive(Debug, Default)]
pub struct Sound {
    gain: Cell<f32>,
}

impl Sound {
    /// 创建音频源，音量收敛到 `0.0..=MAX_GAIN`
    pub fn new(gain: f32) -> Self {
        Self {
            gain: Cell::new(gain.clamp(0.0, MAX_GAIN)),
        }
    }
}

impl Animatable for Sound {
    fn gain(&self) -> Option<f32> {
        Some(self.gain.get())
    }

    fn set_gain(&self, gain: f32) -> bool {
        self.gain.set(gain.clamp(0.0, MAX_GAIN));
        true
    }
}
