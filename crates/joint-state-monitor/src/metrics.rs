//! 监视器运行指标
//!
//! 零开销的原子计数器，用于观察报告流的健康状况。
//! 所有计数器都使用 `Ordering::Relaxed`，可以在任意线程读取，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 监视器实时指标
///
/// # 使用示例
///
/// ```rust
/// use joint_state_monitor::MonitorMetrics;
/// use std::sync::atomic::Ordering;
///
/// let metrics = MonitorMetrics::new();
/// metrics.reports_received.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.reports_received, 1);
/// ```
#[derive(Debug, Default)]
pub struct MonitorMetrics {
    /// 处理过的报告总数
    pub reports_received: AtomicU64,

    /// 写入状态的关节采样数
    pub samples_applied: AtomicU64,

    /// 因关节不在模型中而丢弃的采样数
    pub unknown_joints_dropped: AtomicU64,

    /// 在容差内被修正到限位的采样数
    pub values_clamped: AtomicU64,

    /// 越界超过容差、原样保存的采样数
    ///
    /// 持续增长通常意味着传感器故障或模型限位配置错误。
    pub values_out_of_tolerance: AtomicU64,

    /// 更新回调的调用次数
    pub callbacks_invoked: AtomicU64,
}

impl MonitorMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    ///
    /// 各计数器分别原子读取，计数器之间可能有微小的时间差。
    pub fn snapshot(&self) -> MonitorMetricsSnapshot {
        MonitorMetricsSnapshot {
            reports_received: self.reports_received.load(Ordering::Relaxed),
            samples_applied: self.samples_applied.load(Ordering::Relaxed),
            unknown_joints_dropped: self.unknown_joints_dropped.load(Ordering::Relaxed),
            values_clamped: self.values_clamped.load(Ordering::Relaxed),
            values_out_of_tolerance: self.values_out_of_tolerance.load(Ordering::Relaxed),
            callbacks_invoked: self.callbacks_invoked.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.reports_received.store(0, Ordering::Relaxed);
        self.samples_applied.store(0, Ordering::Relaxed);
        self.unknown_joints_dropped.store(0, Ordering::Relaxed);
        self.values_clamped.store(0, Ordering::Relaxed);
        self.values_out_of_tolerance.store(0, Ordering::Relaxed);
        self.callbacks_invoked.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorMetricsSnapshot {
    pub reports_received: u64,
    pub samples_applied: u64,
    pub unknown_joints_dropped: u64,
    pub values_clamped: u64,
    pub values_out_of_tolerance: u64,
    pub callbacks_invoked: u64,
}
