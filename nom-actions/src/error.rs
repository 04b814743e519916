//! # Error 模块
//!
//! 定义 nom-actions 中使用的错误类型。

use thiserror::Error;

/// 动作构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// 组合动作没有子动作
    #[error("{kind} 至少需要一个子动作")]
    EmptyComposite { kind: &'static str },

    /// 无效的时长
    #[error("无效的时长 {seconds} 秒（必须是非负有限值）")]
    InvalidDuration { seconds: f32 },

    /// 无效的速度
    #[error("无效的速度 {speed}（必须是非负有限值）")]
    InvalidSpeed { speed: f32 },

    /// 纹理帧列表为空
    #[error("纹理帧列表不能为空")]
    NoFrames,

    /// 未知的时间曲线名
    #[error("未知的时间曲线 '{name}'")]
    UnknownTimingCurve { name: String },
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化 / 反序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

/// Result 类型别名
pub type ActionResult<T> = Result<T, ActionError>;

/// 校验以秒为单位的时长，返回毫秒
pub(crate) fn duration_ms(seconds: f32) -> ActionResult<f32> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ActionError::InvalidDuration { seconds });
    }
    Ok(seconds * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_ms() {
        assert_eq!(duration_ms(2.5), Ok(2500.0));
        assert_eq!(duration_ms(0.0), Ok(0.0));
        assert!(matches!(
            duration_ms(-1.0),
            Err(ActionError::InvalidDuration { .. })
        ));
        assert!(duration_ms(f32::NAN).is_err());
        assert!(duration_ms(f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ActionError::EmptyComposite { kind: "GroupAction" };
        assert_eq!(err.to_string(), "GroupAction 至少需要一个子动作");

        let err = ConfigError::ValidationFailed("time_scale 不能为负".to_string());
        assert!(err.to_string().contains("time_scale"));
    }
}
