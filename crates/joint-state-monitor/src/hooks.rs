//! 状态更新回调
//!
//! 单槽位：同一时刻最多注册一个回调，注册新回调会替换旧回调。
//! 槽位使用 `ArcSwapOption`，替换与触发都无锁，
//! 回调执行期间替换也是安全的（正在执行的旧回调会执行完毕）。
//!
//! # 调用约定
//!
//! - 在处理报告的线程上同步调用，每条报告调用一次
//! - 调用发生在合并完成、状态锁释放之后，回调内可以重入监视器
//! - 回调收到的是原始报告（修正前的值），而不是合并后的状态

use arc_swap::ArcSwapOption;
use joint_state_transport::JointReport;
use std::sync::Arc;

/// 状态更新回调 Trait
///
/// 闭包 `Fn(&JointReport) + Send + Sync` 自动实现此 trait。
///
/// # 示例
///
/// ```rust
/// use joint_state_monitor::hooks::{CallbackSlot, StateUpdateCallback};
/// use joint_state_transport::JointReport;
///
/// let slot = CallbackSlot::new();
/// slot.set(|report: &JointReport| {
///     println!("received {} samples", report.len());
/// });
/// assert!(slot.is_set());
/// ```
pub trait StateUpdateCallback: Send + Sync {
    /// 一条报告合并完成后调用
    fn on_state_update(&self, report: &JointReport);
}

impl<F> StateUpdateCallback for F
where
    F: Fn(&JointReport) + Send + Sync,
{
    fn on_state_update(&self, report: &JointReport) {
        self(report)
    }
}

type BoxedCallback = Box<dyn StateUpdateCallback>;

/// 回调槽位
#[derive(Default)]
pub struct CallbackSlot {
    slot: ArcSwapOption<BoxedCallback>,
}

impl CallbackSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册回调（替换已有回调）
    pub fn set(&self, callback: impl StateUpdateCallback + 'static) {
        self.set_boxed(Box::new(callback));
    }

    pub fn set_boxed(&self, callback: Box<dyn StateUpdateCallback>) {
        self.slot.store(Some(Arc::new(callback)));
    }

    /// 清空槽位（禁用通知）
    pub fn clear(&self) {
        self.slot.store(None);
    }

    pub fn is_set(&self) -> bool {
        self.slot.load().is_some()
    }

    /// 触发回调，返回是否有回调被调用
    ///
    /// 先取出 `Arc` 再调用，回调执行期间不持有槽位的任何守卫。
    pub fn fire(&self, report: &JointReport) -> bool {
        match self.slot.load_full() {
            Some(callback) => {
                callback.on_state_update(report);
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{Sender, bounded};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct TestCallback {
        tx: Sender<JointReport>,
        count: Arc<AtomicU64>,
    }

    impl StateUpdateCallback for TestCallback {
        fn on_state_update(&self, report: &JointReport) {
            let _ = self.tx.try_send(report.clone());
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_empty_slot_does_nothing() {
        let slot = CallbackSlot::new();
        assert!(!slot.is_set());
        assert!(!slot.fire(&JointReport::now(Vec::new())));
    }

    #[test]
    fn test_fire_passes_report() {
        let slot = CallbackSlot::new();
        let (tx, rx) = bounded(10);
        let count = Arc::new(AtomicU64::new(0));
        slot.set(TestCallback {
            tx,
            count: count.clone(),
        });

        let report = JointReport::from_pairs(std::time::UNIX_EPOCH, [("a", 1.0)]);
        assert!(slot.fire(&report));
        assert_eq!(count.load(Ordering::Relaxed), 1);
        assert_eq!(rx.try_recv().unwrap(), report);
    }

    #[test]
    fn test_set_replaces_previous() {
        let slot = CallbackSlot::new();
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));

        let f = first.clone();
        slot.set(move |_: &JointReport| {
            f.fetch_add(1, Ordering::Relaxed);
        });
        slot.fire(&JointReport::now(Vec::new()));

        let s = second.clone();
        slot.set(move |_: &JointReport| {
            s.fetch_add(1, Ordering::Relaxed);
        });
        slot.fire(&JointReport::now(Vec::new()));
        slot.fire(&JointReport::now(Vec::new()));

        assert_eq!(first.load(Ordering::Relaxed), 1);
        assert_eq!(second.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_clear_disables() {
        let slot = CallbackSlot::new();
        slot.set(|_: &JointReport| {});
        slot.clear();
        assert!(!slot.is_set());
        assert!(!slot.fire(&JointReport::now(Vec::new())));
    }
}
