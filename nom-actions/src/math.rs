//! # Math 模块
//!
//! 叶子动作用到的几何与颜色值类型。

use serde::{Deserialize, Serialize};

/// 整数坐标点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

impl Point2i {
    /// 创建新的坐标点
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 原点
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }
}

impl std::ops::Neg for Point2i {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl std::ops::Add for Point2i {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl From<(i32, i32)> for Point2i {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// 整数尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size2i {
    pub w: i32,
    pub h: i32,
}

impl Size2i {
    /// 创建新的尺寸
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

impl From<(i32, i32)> for Size2i {
    fn from((w, h): (i32, i32)) -> Self {
        Self { w, h }
    }
}

/// 浮点尺寸（缩放因子）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size2f {
    pub w: f32,
    pub h: f32,
}

impl Size2f {
    /// 创建新的缩放因子
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// 均匀缩放
    pub const fn uniform(s: f32) -> Self {
        Self { w: s, h: s }
    }
}

impl std::ops::Neg for Size2f {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.w, -self.h)
    }
}

impl From<(f32, f32)> for Size2f {
    fn from((w, h): (f32, f32)) -> Self {
        Self { w, h }
    }
}

/// RGBA 颜色（每通道 0 - 255）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color4i {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color4i {
    pub const WHITE: Color4i = Color4i::new(255, 255, 255, 255);
    pub const BLACK: Color4i = Color4i::new(0, 0, 0, 255);
    pub const TRANSPARENT: Color4i = Color4i::new(0, 0, 0, 0);

    /// 创建新的颜色
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 创建不透明颜色
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl Default for Color4i {
    fn default() -> Self {
        Self::WHITE
    }
}

/// 四舍五入并收敛到 `0..=255`
pub(crate) fn clamp_channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
