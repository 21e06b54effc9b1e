//! 监视器配置
//!
//! ```toml
//! joint_states_topic = "joint_states"
//! bounds_error = 0.01
//!
//! [transport]
//! queue_capacity = 1024
//! poll_interval_ms = 10
//! ```
//!
//! 所有字段都有默认值，配置文件只需写出需要覆盖的部分。

use crate::error::MonitorError;
use joint_state_transport::{DEFAULT_JOINT_STATES_TOPIC, TransportConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 监视器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// `start_default()` 订阅的 topic
    pub joint_states_topic: String,
    /// 初始限位容差（取绝对值）
    pub bounds_error: f64,
    /// 未显式提供传输层时，内置 `LocalBus` 使用的配置
    pub transport: TransportConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            joint_states_topic: DEFAULT_JOINT_STATES_TOPIC.to_string(),
            bounds_error: 0.0,
            transport: TransportConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, MonitorError> {
        Ok(toml::from_str(content)?)
    }

    /// 从 TOML 文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MonitorError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
