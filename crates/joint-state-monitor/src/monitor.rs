//! CurrentStateMonitor - 当前关节状态监视器
//!
//! 订阅关节状态报告，持续合并为一份完整的规范状态，
//! 供规划器、控制器在任意线程查询。
//!
//! # 生命周期
//!
//! ```text
//! new() ──▶ Stopped ──start_state_monitor()──▶ Started
//!              ▲                                  │
//!              └──────stop_state_monitor()────────┘
//! ```
//!
//! - 重复 start 同一 topic 为空操作；换 topic 会先取消旧订阅再订阅新 topic
//! - 重复 stop 为空操作；Drop 时自动 stop
//! - Stopped 状态下不处理任何报告（已排队的报告尽力丢弃）
//!
//! # 借用约定
//!
//! 关节模型与坐标变换提供者以非拥有引用传入，调用方保证它们比监视器活得更久
//! （由生命周期 `'a` 在编译期检查）。

use crate::config::MonitorConfig;
use crate::context::MonitorContext;
use crate::error::MonitorError;
use crate::hooks::StateUpdateCallback;
use crate::metrics::MonitorMetricsSnapshot;
use crate::state::ApplyOutcome;
use arc_swap::ArcSwapOption;
use joint_state_model::{JointModel, KinematicModel, KinematicState, TransformProvider};
use joint_state_transport::{JointReport, JointStateTransport, ReportHandler, Subscription};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// 当前关节状态监视器
///
/// 所有方法都只需要 `&self`，可以在多个线程间共享（例如 `std::thread::scope`）。
pub struct CurrentStateMonitor<'a, M: JointModel + ?Sized = KinematicModel> {
    /// 关节模型（非拥有）
    model: &'a M,
    /// 坐标变换提供者（非拥有，监视器本身不使用）
    transforms: &'a dyn TransformProvider,
    /// 报告来源
    transport: Arc<dyn JointStateTransport>,
    /// 与分发线程共享的状态
    ctx: Arc<MonitorContext>,
    /// 当前配置
    config: MonitorConfig,
    /// 当前订阅（start/stop 互斥，持锁直到旧分发线程退出）
    subscription: Mutex<Option<Box<dyn Subscription>>>,
    /// 当前监听的 topic（供查询使用，不经过生命周期锁）
    active_topic: ArcSwapOption<String>,
}

impl<'a, M: JointModel + ?Sized> CurrentStateMonitor<'a, M> {
    /// 创建监视器（初始为 Stopped）
    ///
    /// # 错误
    /// - `MonitorError::Model`: 模型非法（关节名重复/为空、限位非法）
    pub fn new(
        model: &'a M,
        transforms: &'a dyn TransformProvider,
        transport: Arc<dyn JointStateTransport>,
    ) -> Result<Self, MonitorError> {
        Self::with_config(model, transforms, transport, MonitorConfig::default())
    }

    /// 使用指定配置创建监视器
    pub fn with_config(
        model: &'a M,
        transforms: &'a dyn TransformProvider,
        transport: Arc<dyn JointStateTransport>,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        model.validate()?;

        let ctx = Arc::new(MonitorContext::new(model.joints(), config.bounds_error));
        debug!(
            "Current state monitor created for model '{}' ({} joints)",
            model.model_name(),
            ctx.aggregator.joint_count()
        );

        Ok(Self {
            model,
            transforms,
            transport,
            ctx,
            config,
            subscription: Mutex::new(None),
            active_topic: ArcSwapOption::empty(),
        })
    }

    // ------------------------------------------------------------------
    // 生命周期
    // ------------------------------------------------------------------

    /// 开始监听 `topic` 上的关节状态报告
    ///
    /// 已在监听同一 topic 时为空操作；监听其他 topic 时替换订阅。
    ///
    /// # 错误
    /// - `MonitorError::Transport`: 订阅失败（此时监视器处于 Stopped）
    pub fn start_state_monitor(&self, topic: &str) -> Result<(), MonitorError> {
        let mut active = self.subscription.lock();

        if let Some(current) = active.as_ref() {
            if current.topic() == topic && current.is_active() {
                debug!("State monitor already listening on '{}'", topic);
                return Ok(());
            }
            info!(
                "State monitor switching from '{}' to '{}'",
                current.topic(),
                topic
            );
        }

        // 先让查询看到 Stopped，再等待旧分发线程退出
        self.active_topic.store(None);
        if let Some(mut old) = active.take() {
            old.shutdown();
        }

        let ctx = self.ctx.clone();
        let handler: Arc<dyn ReportHandler> = Arc::new(move |report: &JointReport| {
            ctx.apply_report(report);
        });
        *active = Some(self.transport.subscribe(topic, handler)?);
        self.active_topic.store(Some(Arc::new(topic.to_string())));

        info!("Listening to joint states on topic '{}'", topic);
        Ok(())
    }

    /// 在配置的默认 topic 上开始监听（默认 `"joint_states"`）
    pub fn start_default(&self) -> Result<(), MonitorError> {
        self.start_state_monitor(&self.config.joint_states_topic)
    }

    /// 停止监听（未启动时为空操作）
    ///
    /// 持有生命周期锁直到分发线程退出，并发的 start 会等到旧订阅完全结束。
    /// 不能在更新回调内调用 start/stop：停止时会等待分发线程结束。
    /// 回调内可以调用 [`is_active`](Self::is_active) 等查询，它们不经过生命周期锁。
    pub fn stop_state_monitor(&self) {
        let mut active = self.subscription.lock();
        self.active_topic.store(None);
        if let Some(mut sub) = active.take() {
            sub.shutdown();
            info!("No longer listening for joint states on '{}'", sub.topic());
        }
    }

    /// 是否处于 Started 状态
    pub fn is_active(&self) -> bool {
        self.active_topic.load().is_some()
    }

    /// 当前监听的 topic
    pub fn monitored_topic(&self) -> Option<String> {
        self.active_topic.load_full().map(|topic| topic.as_ref().clone())
    }

    // ------------------------------------------------------------------
    // 状态更新
    // ------------------------------------------------------------------

    /// 直接合并一条报告（与传输层投递走同一路径）
    ///
    /// 未知关节被丢弃；越界值按容差策略处理；之后触发一次更新回调。
    pub fn apply_report(&self, report: &JointReport) -> ApplyOutcome {
        self.ctx.apply_report(report)
    }

    /// 注册更新回调（替换已有回调）
    pub fn set_on_state_update_callback(&self, callback: impl StateUpdateCallback + 'static) {
        self.ctx.callback.set(callback);
    }

    /// 清除更新回调
    pub fn clear_on_state_update_callback(&self) {
        self.ctx.callback.clear();
    }

    /// 设置限位容差（保存绝对值）
    pub fn set_bounds_error(&self, error: f64) {
        self.ctx.tolerance.set(error);
    }

    /// 当前限位容差
    pub fn get_bounds_error(&self) -> f64 {
        self.ctx.tolerance.get()
    }

    // ------------------------------------------------------------------
    // 查询
    // ------------------------------------------------------------------

    /// 是否拥有所有关节的（足够新的）状态
    ///
    /// - `max_age`: 允许的最大数据年龄，`None` 表示只要求收到过数据
    /// - `missing`: 若提供，按模型顺序填入缺失或过期的关节名
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let mut missing = Vec::new();
    /// if !monitor.have_complete_state(Some(Duration::from_secs(1)), Some(&mut missing)) {
    ///     tracing::warn!("Refusing to plan, stale joints: {:?}", missing);
    /// }
    /// ```
    pub fn have_complete_state(
        &self,
        max_age: Option<Duration>,
        missing: Option<&mut Vec<String>>,
    ) -> bool {
        self.ctx
            .aggregator
            .have_complete_state(SystemTime::now(), max_age, missing)
    }

    /// 缺失或过期的关节名（模型顺序）
    pub fn missing_joints(&self, max_age: Option<Duration>) -> Vec<String> {
        let mut missing = Vec::new();
        self.have_complete_state(max_age, Some(&mut missing));
        missing
    }

    /// 阻塞等待状态完整，超时返回 false
    pub fn wait_for_complete_state(&self, max_age: Option<Duration>, timeout: Duration) -> bool {
        self.ctx.aggregator.wait_for_complete_state(max_age, timeout)
    }

    /// 当前完整运动学状态（模型结构 + 规范状态值）
    pub fn get_current_state(&self) -> KinematicState {
        let mut state = self.model.default_state();
        self.ctx.aggregator.fill_state(&mut state);
        state
    }

    /// 当前关节值拷贝（关节名 → 值）
    pub fn get_current_state_values(&self) -> HashMap<String, f64> {
        self.ctx.aggregator.values()
    }

    /// 已收到数据的关节 → 最近更新时间
    pub fn get_last_update_times(&self) -> HashMap<String, SystemTime> {
        self.ctx.aggregator.last_update_times()
    }

    /// 所有关节中最新的更新时间
    pub fn latest_update_time(&self) -> Option<SystemTime> {
        self.ctx.aggregator.latest_update_time()
    }

    /// 运行指标快照
    pub fn metrics(&self) -> MonitorMetricsSnapshot {
        self.ctx.metrics.snapshot()
    }

    // ------------------------------------------------------------------
    // 外部协作者
    // ------------------------------------------------------------------

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn transforms(&self) -> &'a dyn TransformProvider {
        self.transforms
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// 共享上下文（用于在无法借用监视器的线程中处理报告）
    pub fn context(&self) -> Arc<MonitorContext> {
        self.ctx.clone()
    }
}

impl<M: JointModel + ?Sized> Drop for CurrentStateMonitor<'_, M> {
    fn drop(&mut self) {
        self.stop_state_monitor();
    }
}
