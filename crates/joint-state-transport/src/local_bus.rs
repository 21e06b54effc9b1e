//! 进程内 topic 总线
//!
//! [`LocalBus`] 把发布的报告扇出到该 topic 的所有订阅者。
//! 每个订阅拥有一个有界队列和一个分发线程：
//!
//! ```text
//! publish() ──try_send──▶ bounded queue ──recv_timeout──▶ dispatch thread ──▶ handler
//! ```
//!
//! - **非阻塞发布**: 队列满时丢弃报告并计数，发布方永不阻塞
//! - **生命周期**: 订阅句柄 `shutdown()` / Drop 时停止并 join 分发线程，
//!   队列中尚未分发的报告被丢弃（尽力而为）

use crate::error::TransportError;
use crate::report::JointReport;
use crate::{JointStateTransport, ReportHandler, Subscription, validate_topic};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{trace, warn};

/// 总线配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// 每个订阅的队列容量（报告数）
    pub queue_capacity: usize,
    /// 分发线程检查停止标志的周期（毫秒）
    pub poll_interval_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            poll_interval_ms: 10,
        }
    }
}

/// 总线计数器
#[derive(Debug, Default)]
pub struct BusMetrics {
    /// 调用 `publish` 的次数
    pub published: AtomicU64,
    /// 已交给 handler 的报告数（按订阅计）
    pub delivered: AtomicU64,
    /// 因队列满被丢弃的报告数（按订阅计）
    pub dropped: AtomicU64,
}

impl BusMetrics {
    pub fn snapshot(&self) -> BusMetricsSnapshot {
        BusMetricsSnapshot {
            published: self.published.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// 总线计数器快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusMetricsSnapshot {
    pub published: u64,
    pub delivered: u64,
    pub dropped: u64,
}

struct SubscriberSlot {
    id: u64,
    tx: Sender<Arc<JointReport>>,
}

struct BusInner {
    config: TransportConfig,
    topics: RwLock<HashMap<String, Vec<SubscriberSlot>>>,
    next_id: AtomicU64,
    closed: AtomicBool,
    metrics: Arc<BusMetrics>,
}

impl BusInner {
    fn unregister(&self, topic: &str, id: u64) {
        let mut topics = self.topics.write();
        if let Some(slots) = topics.get_mut(topic) {
            slots.retain(|slot| slot.id != id);
            if slots.is_empty() {
                topics.remove(topic);
            }
        }
    }
}

/// 进程内 topic 总线
///
/// Clone 得到的是同一条总线的另一个句柄。
#[derive(Clone)]
pub struct LocalBus {
    inner: Arc<BusInner>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            inner: Arc::new(BusInner {
                config,
                topics: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                closed: AtomicBool::new(false),
                metrics: Arc::new(BusMetrics::default()),
            }),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.inner.config
    }

    /// 发布一条报告，返回成功入队的订阅数
    ///
    /// 队列满的订阅会丢弃这条报告（不阻塞发布方）。
    pub fn publish(&self, topic: &str, report: JointReport) -> Result<usize, TransportError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        validate_topic(topic)?;
        self.inner.metrics.published.fetch_add(1, Ordering::Relaxed);

        let report = Arc::new(report);
        let topics = self.inner.topics.read();
        let Some(slots) = topics.get(topic) else {
            trace!("No subscribers on topic '{}'", topic);
            return Ok(0);
        };

        let mut queued = 0;
        for slot in slots {
            match slot.tx.try_send(report.clone()) {
                Ok(()) => queued += 1,
                Err(TrySendError::Full(_)) => {
                    self.inner.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "Subscriber {} on topic '{}' queue full, report dropped",
                        slot.id, topic
                    );
                },
                Err(TrySendError::Disconnected(_)) => {
                    // 分发线程已退出，等待句柄注销
                },
            }
        }
        Ok(queued)
    }

    /// 某 topic 当前的订阅数
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner.topics.read().get(topic).map_or(0, Vec::len)
    }

    /// 关闭总线：拒绝新的发布/订阅，并断开所有订阅队列
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.topics.write().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn metrics(&self) -> BusMetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl JointStateTransport for LocalBus {
    fn subscribe(
        &self,
        topic: &str,
        handler: Arc<dyn ReportHandler>,
    ) -> Result<Box<dyn Subscription>, TransportError> {
        let subscription = self.subscribe_local(topic, handler)?;
        Ok(Box::new(subscription))
    }
}

impl LocalBus {
    /// 与 [`JointStateTransport::subscribe`] 相同，但返回具体类型
    pub fn subscribe_local(
        &self,
        topic: &str,
        handler: Arc<dyn ReportHandler>,
    ) -> Result<LocalSubscription, TransportError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        validate_topic(topic)?;

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = bounded(self.inner.config.queue_capacity.max(1));
        let is_running = Arc::new(AtomicBool::new(true));
        let poll_interval = Duration::from_millis(self.inner.config.poll_interval_ms.max(1));

        let thread = {
            let is_running = is_running.clone();
            let metrics = self.inner.metrics.clone();
            thread::Builder::new()
                .name(format!("joint-state-dispatch-{}", id))
                .spawn(move || {
                    dispatch_loop(rx, handler, is_running, metrics, poll_interval);
                })
                .map_err(|e| TransportError::Spawn(e.to_string()))?
        };

        self.inner
            .topics
            .write()
            .entry(topic.to_string())
            .or_default()
            .push(SubscriberSlot { id, tx });

        trace!("Subscriber {} registered on topic '{}'", id, topic);

        Ok(LocalSubscription {
            id,
            topic: topic.to_string(),
            bus: Arc::downgrade(&self.inner),
            is_running,
            thread: Some(thread),
        })
    }
}

/// 分发循环（每个订阅一个线程）
fn dispatch_loop(
    rx: Receiver<Arc<JointReport>>,
    handler: Arc<dyn ReportHandler>,
    is_running: Arc<AtomicBool>,
    metrics: Arc<BusMetrics>,
    poll_interval: Duration,
) {
    loop {
        // Acquire: 看到 false 时必须同时看到停止前的所有写入
        if !is_running.load(Ordering::Acquire) {
            trace!("Dispatch thread: is_running flag is false, exiting");
            break;
        }

        match rx.recv_timeout(poll_interval) {
            Ok(report) => {
                // 停止后不再处理排队中的报告
                if !is_running.load(Ordering::Acquire) {
                    break;
                }
                handler.on_report(&report);
                metrics.delivered.fetch_add(1, Ordering::Relaxed);
            },
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                trace!("Dispatch thread: queue disconnected");
                break;
            },
        }
    }

    trace!("Dispatch thread: loop exited");
}

/// [`LocalBus`] 的订阅句柄
pub struct LocalSubscription {
    id: u64,
    topic: String,
    bus: Weak<BusInner>,
    is_running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl LocalSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Subscription for LocalSubscription {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn is_active(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn shutdown(&mut self) {
        // Release: 分发线程看到 false 时，之前的写入均可见
        self.is_running.store(false, Ordering::Release);

        if let Some(bus) = self.bus.upgrade() {
            bus.unregister(&self.topic, self.id);
        }

        if let Some(handle) = self.thread.take() {
            // handler 内部取消订阅时不能 join 自己
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                warn!(
                    "Dispatch thread for subscriber {} on '{}' panicked",
                    self.id, self.topic
                );
            }
        }
    }
}

impl Drop for LocalSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}
