//! 传输层错误类型定义

use thiserror::Error;

/// 传输层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 总线已关闭
    #[error("Transport closed")]
    Closed,

    /// topic 名非法
    #[error("Invalid topic name: '{0}'")]
    InvalidTopic(String),

    /// 分发线程启动失败
    #[error("Failed to spawn dispatch thread: {0}")]
    Spawn(String),
}
