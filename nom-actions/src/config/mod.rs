//! # Config 模块
//!
//! 动作播放器的配置。
//!
//! ## 配置优先级
//!
//! 1. 代码中显式构造的 `PlayerConfig`（最高）
//! 2. 配置文件（JSON）
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::ConfigError;

/// 播放器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// 时间缩放
    ///
    /// 每次 `update(delta_ms)` 的 delta 先乘以该值再传给动作。
    /// 必须是非负有限值，0 相当于冻结所有动作。
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,

    /// 自动生成名字的前缀（后接递增序号）
    #[serde(default)]
    pub auto_name_prefix: String,

    /// 名字冲突时是否打印警告
    #[serde(default = "default_warn_on_name_collision")]
    pub warn_on_name_collision: bool,
}

// 默认值函数
fn default_time_scale() -> f32 {
    1.0
}

fn default_warn_on_name_collision() -> bool {
    true
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            auto_name_prefix: String::new(),
            warn_on_name_collision: default_warn_on_name_collision(),
        }
    }
}

impl PlayerConfig {
    /// 加载配置文件
    ///
    /// 文件不存在、解析失败或验证失败时返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        let config: Self = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "配置文件解析失败，使用默认配置");
                    return Self::default();
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件读取失败，使用默认配置");
                return Self::default();
            }
        };

        if let Err(e) = config.validate() {
            warn!(path = %path.display(), error = %e, "配置无效，使用默认配置");
            return Self::default();
        }

        info!(path = %path.display(), "配置文件加载成功");
        config
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::ValidationFailed(format!(
                "time_scale 必须是非负有限值: {}",
                self.time_scale
            )));
        }
        Ok(())
    }

    /// 设置时间缩放
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// 设置自动命名前缀
    pub fn with_auto_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auto_name_prefix = prefix.into();
        self
    }

    /// 设置是否在名字冲突时警告
    pub fn with_warn_on_name_collision(mut self, warn: bool) -> Self {
        self.warn_on_name_collision = warn;
        self
    }
}
