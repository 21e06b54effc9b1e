//! 共享监视器上下文
//!
//! [`MonitorContext`] 聚合了处理报告所需的全部共享状态，
//! 由监视器和传输层分发线程通过 `Arc` 共同持有。

use crate::bounds::BoundsTolerance;
use crate::hooks::CallbackSlot;
use crate::metrics::MonitorMetrics;
use crate::state::{ApplyOutcome, StateAggregator};
use joint_state_model::JointSpec;
use joint_state_transport::JointReport;
use std::sync::atomic::Ordering;
use tracing::trace;

/// 共享监视器上下文
pub struct MonitorContext {
    /// 规范状态
    pub aggregator: StateAggregator,
    /// 更新回调槽位
    pub callback: CallbackSlot,
    /// 限位容差
    pub tolerance: BoundsTolerance,
    /// 运行指标
    pub metrics: MonitorMetrics,
}

impl MonitorContext {
    pub fn new(joints: &[JointSpec], bounds_error: f64) -> Self {
        Self {
            aggregator: StateAggregator::new(joints),
            callback: CallbackSlot::new(),
            tolerance: BoundsTolerance::new(bounds_error),
            metrics: MonitorMetrics::new(),
        }
    }

    /// 处理一条报告（两阶段）
    ///
    /// 1. 临界区：在状态锁内合并整条报告
    /// 2. 锁释放后：通知回调（每条报告恰好一次，无论命中几个关节）
    ///
    /// 阶段 2 一定发生在阶段 1 完成之后，回调可以安全地重入监视器。
    pub fn apply_report(&self, report: &JointReport) -> ApplyOutcome {
        let outcome = self.aggregator.merge(report, self.tolerance.get());

        self.metrics.reports_received.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .samples_applied
            .fetch_add(outcome.applied as u64, Ordering::Relaxed);
        self.metrics
            .unknown_joints_dropped
            .fetch_add(outcome.ignored as u64, Ordering::Relaxed);
        self.metrics
            .values_clamped
            .fetch_add(outcome.clamped as u64, Ordering::Relaxed);
        self.metrics
            .values_out_of_tolerance
            .fetch_add(outcome.out_of_tolerance as u64, Ordering::Relaxed);

        trace!(
            "Report merged: {} applied, {} ignored, {} clamped",
            outcome.applied, outcome.ignored, outcome.clamped
        );

        if self.callback.fire(report) {
            self.metrics.callbacks_invoked.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }
}
