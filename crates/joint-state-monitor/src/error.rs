//! 监视器错误类型定义

use joint_state_model::ModelError;
use joint_state_transport::TransportError;
use thiserror::Error;

/// 监视器错误类型
///
/// 正常运行中的异常数据（未知关节、超限值、缺失/过期关节）都不是错误，
/// 只有构造和订阅阶段的失败才会通过此类型返回。
#[derive(Error, Debug)]
pub enum MonitorError {
    /// 关节模型非法（构造时快速失败）
    #[error("Invalid joint model: {0}")]
    Model(#[from] ModelError),

    /// 传输层错误（订阅失败）
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 配置文件解析失败
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// 配置文件读取失败
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}
