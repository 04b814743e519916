//! # Timing 模块
//!
//! 时间曲线（缓动函数）库，用于动作的时间插值。
//!
//! 所有曲线函数签名一致：`(t, b, c, d) -> value`
//!
//! - `t`: 已经过的时间（毫秒）
//! - `b`: 起始值
//! - `c`: 变化量
//! - `d`: 总时长（毫秒）
//!
//! `t <= 0` 时返回 `b`，`t >= d` 时精确返回 `b + c`；
//! Back / Bounce / Elastic 在中间段允许越过 `[b, b + c]`。

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

/// 时间曲线函数指针
pub type TimingFn = fn(f32, f32, f32, f32) -> f32;

/// Back 曲线的回弹系数
const BACK_OVERSHOOT: f32 = 1.70158;

/// Elastic 曲线的周期（相对于总时长）
const ELASTIC_PERIOD: f32 = 0.3;

/// Elastic 缓入缓出的周期
const ELASTIC_IN_OUT_PERIOD: f32 = 0.45;

/// 处理端点后把归一化进度交给 `ease`
fn tween(t: f32, b: f32, c: f32, d: f32, ease: fn(f32) -> f32) -> f32 {
    if d <= 0.0 || t >= d {
        return b + c;
    }
    if t <= 0.0 {
        return b;
    }
    b + c * ease(t / d)
}

/// 由缓入曲线得到缓出曲线
fn mirror_out(p: f32, ease_in: fn(f32) -> f32) -> f32 {
    1.0 - ease_in(1.0 - p)
}

/// 由缓入曲线得到缓入缓出曲线（在中点拼接）
fn mirror_in_out(p: f32, ease_in: fn(f32) -> f32) -> f32 {
    if p < 0.5 {
        ease_in(p * 2.0) / 2.0
    } else {
        1.0 - ease_in(2.0 - p * 2.0) / 2.0
    }
}

fn linear(p: f32) -> f32 {
    p
}

fn quad(p: f32) -> f32 {
    p * p
}

fn cubic(p: f32) -> f32 {
    p * p * p
}

fn quart(p: f32) -> f32 {
    p.powi(4)
}

fn quint(p: f32) -> f32 {
    p.powi(5)
}

fn sine(p: f32) -> f32 {
    1.0 - (p * PI / 2.0).cos()
}

fn circ(p: f32) -> f32 {
    1.0 - (1.0 - p * p).max(0.0).sqrt()
}

fn expo(p: f32) -> f32 {
    if p == 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * (p - 1.0))
    }
}

fn back_with(p: f32, s: f32) -> f32 {
    p * p * ((s + 1.0) * p - s)
}

fn back(p: f32) -> f32 {
    back_with(p, BACK_OVERSHOOT)
}

fn back_in_out_half(p: f32) -> f32 {
    back_with(p, BACK_OVERSHOOT * 1.525)
}

fn elastic_with(p: f32, period: f32) -> f32 {
    if p == 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let s = period / 4.0;
    let q = p - 1.0;
    -(2.0_f32.powf(10.0 * q) * ((q - s) * (2.0 * PI) / period).sin())
}

fn elastic(p: f32) -> f32 {
    elastic_with(p, ELASTIC_PERIOD)
}

fn elastic_in_out_half(p: f32) -> f32 {
    elastic_with(p, ELASTIC_IN_OUT_PERIOD)
}

/// 弹跳缓出
fn bounce_out(p: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if p < 1.0 / d1 {
        n1 * p * p
    } else if p < 2.0 / d1 {
        let p = p - 1.5 / d1;
        n1 * p * p + 0.75
    } else if p < 2.5 / d1 {
        let p = p - 2.25 / d1;
        n1 * p * p + 0.9375
    } else {
        let p = p - 2.625 / d1;
        n1 * p * p + 0.984375
    }
}

fn bounce(p: f32) -> f32 {
    1.0 - bounce_out(1.0 - p)
}

/// 线性
pub struct Linear;

impl Linear {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, linear)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, linear)
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, linear)
    }
}

/// 二次
pub struct Quad;

impl Quad {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, quad)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, quad))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, quad))
    }
}

/// 三次
pub struct Cubic;

impl Cubic {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, cubic)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, cubic))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, cubic))
    }
}

/// 四次
pub struct Quart;

impl Quart {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, quart)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, quart))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, quart))
    }
}

/// 五次
pub struct Quint;

impl Quint {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, quint)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, quint))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, quint))
    }
}

/// 回弹（起步先反向）
pub struct Back;

impl Back {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, back)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, back))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, back_in_out_half))
    }
}

/// 弹跳
pub struct Bounce;

impl Bounce {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, bounce)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, bounce_out)
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, bounce))
    }
}

/// 圆弧
pub struct Circ;

impl Circ {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, circ)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, circ))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, circ))
    }
}

/// 弹性
pub struct Elastic;

impl Elastic {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, elastic)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, elastic))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, elastic_in_out_half))
    }
}

/// 指数
pub struct Expo;

impl Expo {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, expo)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, expo))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, expo))
    }
}

/// 正弦
pub struct Sine;

impl Sine {
    pub fn ease_in(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, sine)
    }

    pub fn ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_out(p, sine))
    }

    pub fn ease_in_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
        tween(t, b, c, d, |p| mirror_in_out(p, sine))
    }
}

/// 曲线族
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveFamily {
    Linear,
    Quad,
    Cubic,
    Quart,
    Quint,
    Back,
    Bounce,
    Circ,
    Elastic,
    Expo,
    Sine,
}

impl CurveFamily {
    /// 全部曲线族（按声明顺序）
    pub const ALL: [CurveFamily; 11] = [
        CurveFamily::Linear,
        CurveFamily::Quad,
        CurveFamily::Cubic,
        CurveFamily::Quart,
        CurveFamily::Quint,
        CurveFamily::Back,
        CurveFamily::Bounce,
        CurveFamily::Circ,
        CurveFamily::Elastic,
        CurveFamily::Expo,
        CurveFamily::Sine,
    ];

    fn as_str(self) -> &'static str {
        match self {
            CurveFamily::Linear => "linear",
            CurveFamily::Quad => "quad",
            CurveFamily::Cubic => "cubic",
            CurveFamily::Quart => "quart",
            CurveFamily::Quint => "quint",
            CurveFamily::Back => "back",
            CurveFamily::Bounce => "bounce",
            CurveFamily::Circ => "circ",
            CurveFamily::Elastic => "elastic",
            CurveFamily::Expo => "expo",
            CurveFamily::Sine => "sine",
        }
    }

    /// 曲线族是否会越过 `[b, b + c]`
    pub fn overshoots(self) -> bool {
        matches!(
            self,
            CurveFamily::Back | CurveFamily::Bounce | CurveFamily::Elastic
        )
    }
}

/// 缓动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Easing {
    /// 缓入（先慢后快）
    In,
    /// 缓出（先快后慢）
    Out,
    /// 缓入缓出（两头慢中间快）
    InOut,
}

impl Easing {
    pub const ALL: [Easing; 3] = [Easing::In, Easing::Out, Easing::InOut];

    fn as_str(self) -> &'static str {
        match self {
            Easing::In => "ease_in",
            Easing::Out => "ease_out",
            Easing::InOut => "ease_in_out",
        }
    }
}

/// 时间曲线
///
/// 曲线族 + 缓动方向，可以存进动作和配置文件。
/// 文本形式为 `"quad_ease_out"` 这样的名字。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimingCurve {
    pub family: CurveFamily,
    pub easing: Easing,
}

impl TimingCurve {
    /// 创建时间曲线
    pub const fn new(family: CurveFamily, easing: Easing) -> Self {
        Self { family, easing }
    }

    /// 默认曲线：`linear_ease_in_out`
    pub const LINEAR: TimingCurve = TimingCurve::new(CurveFamily::Linear, Easing::InOut);

    /// 取出对应的曲线函数
    pub fn function(&self) -> TimingFn {
        match (self.family, self.easing) {
            (CurveFamily::Linear, Easing::In) => Linear::ease_in,
            (CurveFamily::Linear, Easing::Out) => Linear::ease_out,
            (CurveFamily::Linear, Easing::InOut) => Linear::ease_in_out,
            (CurveFamily::Quad, Easing::In) => Quad::ease_in,
            (CurveFamily::Quad, Easing::Out) => Quad::ease_out,
            (CurveFamily::Quad, Easing::InOut) => Quad::ease_in_out,
            (CurveFamily::Cubic, Easing::In) => Cubic::ease_in,
            (CurveFamily::Cubic, Easing::Out) => Cubic::ease_out,
            (CurveFamily::Cubic, Easing::InOut) => Cubic::ease_in_out,
            (CurveFamily::Quart, Easing::In) => Quart::ease_in,
            (CurveFamily::Quart, Easing::Out) => Quart::ease_out,
            (CurveFamily::Quart, Easing::InOut) => Quart::ease_in_out,
            (CurveFamily::Quint, Easing::In) => Quint::ease_in,
            (CurveFamily::Quint, Easing::Out) => Quint::ease_out,
            (CurveFamily::Quint, Easing::InOut) => Quint::ease_in_out,
            (CurveFamily::Back, Easing::In) => Back::ease_in,
            (CurveFamily::Back, Easing::Out) => Back::ease_out,
            (CurveFamily::Back, Easing::InOut) => Back::ease_in_out,
            (CurveFamily::Bounce, Easing::In) => Bounce::ease_in,
            (CurveFamily::Bounce, Easing::Out) => Bounce::ease_out,
            (CurveFamily::Bounce, Easing::InOut) => Bounce::ease_in_out,
            (CurveFamily::Circ, Easing::In) => Circ::ease_in,
            (CurveFamily::Circ, Easing::Out) => Circ::ease_out,
            (CurveFamily::Circ, Easing::InOut) => Circ::ease_in_out,
            (CurveFamily::Elastic, Easing::In) => Elastic::ease_in,
            (CurveFamily::Elastic, Easing::Out) => Elastic::ease_out,
            (CurveFamily::Elastic, Easing::InOut) => Elastic::ease_in_out,
            (CurveFamily::Expo, Easing::In) => Expo::ease_in,
            (CurveFamily::Expo, Easing::Out) => Expo::ease_out,
            (CurveFamily::Expo, Easing::InOut) => Expo::ease_in_out,
            (CurveFamily::Sine, Easing::In) => Sine::ease_in,
            (CurveFamily::Sine, Easing::Out) => Sine::ease_out,
            (CurveFamily::Sine, Easing::InOut) => Sine::ease_in_out,
        }
    }

    /// 计算曲线值
    ///
    /// # 参数
    /// - `t`: 已经过时间（毫秒）
    /// - `b`: 起始值
    /// - `c`: 变化量
    /// - `d`: 总时长（毫秒）
    pub fn value(&self, t: f32, b: f32, c: f32, d: f32) -> f32 {
        (self.function())(t, b, c, d)
    }

    /// 遍历全部 33 条曲线
    pub fn all() -> impl Iterator<Item = TimingCurve> {
        CurveFamily::ALL.into_iter().flat_map(|family| {
            Easing::ALL
                .into_iter()
                .map(move |easing| TimingCurve::new(family, easing))
        })
    }
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl fmt::Display for TimingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.family.as_str(), self.easing.as_str())
    }
}

impl FromStr for TimingCurve {
    type Err = ActionError;

    /// 从 `"quad_ease_out"` 形式的名字解析（不区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let unknown = || ActionError::UnknownTimingCurve {
            name: s.to_string(),
        };

        let (family, rest) = lower.split_once('_').ok_or_else(unknown)?;
        let family = CurveFamily::ALL
            .into_iter()
            .find(|f| f.as_str() == family)
            .ok_or_else(unknown)?;
        let easing = Easing::ALL
            .into_iter()
            .find(|e| e.as_str() == rest)
            .ok_or_else(unknown)?;

        Ok(TimingCurve::new(family, easing))
    }
}

impl From<TimingCurve> for String {
    fn from(curve: TimingCurve) -> Self {
        curve.to_string()
    }
}

impl TryFrom<String> for TimingCurve {
    type Error = ActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
