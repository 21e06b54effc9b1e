//! # Joint State Transport
//!
//! 关节状态报告的传输层抽象，提供统一的订阅接口。
//!
//! - [`JointReport`]: 一次异步投递的 (关节名, 值) 批次 + 时间戳
//! - [`JointStateTransport`]: 按 topic 订阅报告
//! - [`Subscription`]: 订阅句柄，`shutdown()` 或 Drop 时取消订阅
//! - [`LocalBus`]: 进程内 topic 总线实现（每个订阅一个分发线程）
//!
//! 跨批次的投递顺序不保证按时间戳严格递增。

use std::sync::Arc;

pub mod error;
pub mod local_bus;
pub mod report;

pub use error::TransportError;
pub use local_bus::{BusMetrics, BusMetricsSnapshot, LocalBus, LocalSubscription, TransportConfig};
pub use report::{JointReport, JointSample};

/// 约定俗成的关节状态 topic 名
pub const DEFAULT_JOINT_STATES_TOPIC: &str = "joint_states";

/// 报告处理回调
///
/// 在传输层的分发线程上同步调用。实现应尽快返回，
/// 长时间阻塞会导致该订阅的队列积压（队列满后丢弃新报告）。
pub trait ReportHandler: Send + Sync + 'static {
    fn on_report(&self, report: &JointReport);
}

impl<F> ReportHandler for F
where
    F: Fn(&JointReport) + Send + Sync + 'static,
{
    fn on_report(&self, report: &JointReport) {
        self(report)
    }
}

/// 订阅句柄
///
/// 同一时刻一个句柄只对应一个 topic。`shutdown()` 可重复调用。
pub trait Subscription: Send {
    /// 订阅的 topic
    fn topic(&self) -> &str;

    /// 是否仍在接收报告
    fn is_active(&self) -> bool;

    /// 取消订阅（停止接收并回收分发线程）
    fn shutdown(&mut self);
}

/// 关节状态传输层
pub trait JointStateTransport: Send + Sync {
    /// 订阅 `topic`，每条报告调用一次 `handler`
    fn subscribe(
        &self,
        topic: &str,
        handler: Arc<dyn ReportHandler>,
    ) -> Result<Box<dyn Subscription>, TransportError>;
}

/// 校验 topic 名：非空且不含空白字符
pub fn validate_topic(topic: &str) -> Result<(), TransportError> {
    if topic.is_empty() || topic.chars().any(char::is_whitespace) {
        return Err(TransportError::InvalidTopic(topic.to_string()));
    }
    Ok(())
}
