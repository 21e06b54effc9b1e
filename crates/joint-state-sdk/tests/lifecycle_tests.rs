//! 生命周期与更新通知测试（经由进程内总线端到端）

mod common;

use crossbeam_channel::{Receiver, bounded};
use joint_state_sdk::model::{KinematicModel, StaticTransforms};
use joint_state_sdk::monitor::MonitorError;
use joint_state_sdk::transport::{JointReport, TransportError};
use joint_state_sdk::{CurrentStateMonitor, LocalBus, MonitorBuilder};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

fn channel_callback(
    monitor: &CurrentStateMonitor<'_>,
) -> Receiver<JointReport> {
    let (tx, rx) = bounded(1024);
    monitor.set_on_state_update_callback(move |report: &JointReport| {
        let _ = tx.try_send(report.clone());
    });
    rx
}

#[test]
fn test_start_stop_are_idempotent() {
    let model = common::arm6();
    let tf = StaticTransforms::new();
    let bus = LocalBus::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(bus.clone())).unwrap();

    monitor.stop_state_monitor();
    assert!(!monitor.is_active());

    for _ in 0..3 {
        monitor.start_default().unwrap();
    }
    assert!(monitor.is_active());
    assert_eq!(bus.subscriber_count("joint_states"), 1);

    for _ in 0..3 {
        monitor.stop_state_monitor();
    }
    assert!(!monitor.is_active());
    assert_eq!(bus.subscriber_count("joint_states"), 0);

    // 停止后可以重新启动
    monitor.start_default().unwrap();
    assert!(monitor.is_active());
}

#[test]
fn test_end_to_end_merge_and_notify() {
    let model = common::arm6();
    let tf = StaticTransforms::new();
    let bus = LocalBus::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(bus.clone())).unwrap();
    let rx = channel_callback(&monitor);
    monitor.start_default().unwrap();

    let first = common::report(&[("joint1", 0.1), ("joint2", 0.2), ("joint3", -0.3)]);
    let second = common::report(&[("joint4", 0.4), ("joint5", 0.5), ("joint6", 0.6), ("tool", 9.0)]);
    bus.publish("joint_states", first.clone()).unwrap();
    bus.publish("joint_states", second.clone()).unwrap();

    // 回调收到的是原始报告，按投递顺序，每条恰好一次
    assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), first);
    assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), second);
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

    assert!(monitor.have_complete_state(Some(Duration::from_secs(60)), None));
    let state = monitor.get_current_state();
    assert_eq!(state.joint_value("joint3"), Some(-0.3));
    assert_eq!(state.joint_value("joint6"), Some(0.6));
    assert_eq!(state.joint_value("tool"), None);

    let metrics = monitor.metrics();
    assert_eq!(metrics.reports_received, 2);
    assert_eq!(metrics.samples_applied, 6);
    assert_eq!(metrics.unknown_joints_dropped, 1);
    assert_eq!(metrics.callbacks_invoked, 2);
}

#[test]
fn test_reports_with_only_unknown_joints_still_notify() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(LocalBus::new())).unwrap();
    let rx = channel_callback(&monitor);

    let report = common::report(&[("unknown", 1.0)]);
    monitor.apply_report(&report);
    assert_eq!(rx.try_recv().unwrap(), report);
    assert!(monitor.get_last_update_times().is_empty());
}

#[test]
fn test_callback_replacement_and_clear() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(LocalBus::new())).unwrap();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let f = first.clone();
    monitor.set_on_state_update_callback(move |_: &JointReport| {
        f.fetch_add(1, Ordering::SeqCst);
    });
    monitor.apply_report(&common::report(&[("a", 0.0)]));

    let s = second.clone();
    monitor.set_on_state_update_callback(move |_: &JointReport| {
        s.fetch_add(1, Ordering::SeqCst);
    });
    monitor.apply_report(&common::report(&[("a", 0.0)]));

    monitor.clear_on_state_update_callback();
    monitor.apply_report(&common::report(&[("a", 0.0)]));

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(monitor.metrics().callbacks_invoked, 2);
}

#[test]
fn test_callback_may_query_monitor_context() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let bus = LocalBus::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(bus.clone())).unwrap();

    let ctx = Arc::downgrade(&monitor.context());
    let (tx, rx) = bounded(4);
    monitor.set_on_state_update_callback(move |_: &JointReport| {
        if let Some(ctx) = ctx.upgrade() {
            let _ = tx.try_send(ctx.aggregator.joint_value("a"));
        }
    });
    monitor.start_default().unwrap();

    bus.publish("joint_states", common::report(&[("a", 0.42)])).unwrap();
    // 回调执行时合并已经完成
    assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), Some(0.42));
}

#[test]
fn test_switching_topics() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let bus = LocalBus::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(bus.clone())).unwrap();

    monitor.start_state_monitor("left/joint_states").unwrap();
    monitor.start_state_monitor("right/joint_states").unwrap();
    assert_eq!(monitor.monitored_topic().as_deref(), Some("right/joint_states"));

    bus.publish("left/joint_states", common::report(&[("a", 0.5)])).unwrap();
    bus.publish("right/joint_states", common::report(&[("b", 0.5)])).unwrap();

    assert!(common::wait_until(|| monitor.missing_joints(None) == vec!["a"]));
    assert_eq!(monitor.metrics().reports_received, 1);
}

#[test]
fn test_stopped_monitor_ignores_traffic() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let bus = LocalBus::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(bus.clone())).unwrap();

    monitor.start_default().unwrap();
    bus.publish("joint_states", common::report(&[("a", 0.1)])).unwrap();
    assert!(common::wait_until(|| monitor.metrics().reports_received == 1));

    monitor.stop_state_monitor();
    bus.publish("joint_states", common::report(&[("a", 0.9)])).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    assert_eq!(monitor.metrics().reports_received, 1);
    assert_eq!(monitor.get_current_state_values()["a"], 0.1);
}

#[test]
fn test_subscribe_failure_leaves_monitor_stopped() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(LocalBus::new())).unwrap();

    let err = monitor.start_state_monitor("").unwrap_err();
    assert!(matches!(
        err,
        MonitorError::Transport(TransportError::InvalidTopic(_))
    ));
    assert!(!monitor.is_active());
}

#[test]
fn test_builder_with_auto_start() {
    let model = common::arm6();
    let tf = StaticTransforms::new();
    let bus = LocalBus::new();
    let (tx, rx) = bounded(4);

    let monitor = MonitorBuilder::new()
        .transport(Arc::new(bus.clone()))
        .topic("arm/joint_states")
        .bounds_error(0.05)
        .on_state_update(move |report: &JointReport| {
            let _ = tx.try_send(report.len());
        })
        .auto_start(true)
        .build(&model, &tf)
        .unwrap();

    bus.publish("arm/joint_states", common::report(&[("joint2", -0.01)])).unwrap();
    assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), 1);
    // -0.01 在容差内，修正到下限 0.0
    assert_eq!(monitor.get_current_state_values()["joint2"], 0.0);
}

/// 构造 `'static` 的共享监视器，回调可以通过 `Weak` 回到监视器本身
fn shared_monitor(bus: &LocalBus) -> Arc<CurrentStateMonitor<'static>> {
    let model: &'static KinematicModel = Box::leak(Box::new(common::two_joint()));
    let tf: &'static StaticTransforms = Box::leak(Box::new(StaticTransforms::new()));
    Arc::new(CurrentStateMonitor::new(model, tf, Arc::new(bus.clone())).unwrap())
}

/// 回调执行中切换 topic：回调里查询生命周期状态不能与切换互锁
#[test]
fn test_topic_switch_while_callback_queries_lifecycle() {
    let bus = LocalBus::new();
    let monitor = shared_monitor(&bus);

    let (entered_tx, entered_rx) = bounded::<()>(1);
    let (queried_tx, queried_rx) = bounded::<(bool, Option<String>)>(1);
    let weak = Arc::downgrade(&monitor);
    monitor.set_on_state_update_callback(move |_: &JointReport| {
        let _ = entered_tx.try_send(());
        thread::sleep(Duration::from_millis(100));
        if let Some(monitor) = weak.upgrade() {
            let _ = queried_tx.try_send((monitor.is_active(), monitor.monitored_topic()));
        }
    });

    monitor.start_state_monitor("left").unwrap();
    bus.publish("left", common::report(&[("a", 0.1)])).unwrap();
    entered_rx.recv_timeout(RECV_TIMEOUT).unwrap();

    let (switched_tx, switched_rx) = bounded::<()>(1);
    let switcher = {
        let monitor = monitor.clone();
        thread::spawn(move || {
            monitor.start_state_monitor("right").unwrap();
            let _ = switched_tx.send(());
        })
    };

    assert!(
        switched_rx.recv_timeout(RECV_TIMEOUT).is_ok(),
        "topic switch blocked by the running callback"
    );
    // 回调内的查询也已返回
    assert!(queried_rx.recv_timeout(RECV_TIMEOUT).is_ok());
    switcher.join().unwrap();
    assert_eq!(monitor.monitored_topic().as_deref(), Some("right"));

    monitor.clear_on_state_update_callback();
    monitor.stop_state_monitor();
}

/// 并发 start/stop：任何时刻最多一个分发线程在处理报告
#[test]
fn test_concurrent_start_stop_keeps_single_dispatcher() {
    let bus = LocalBus::new();
    let monitor = shared_monitor(&bus);

    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    {
        let in_flight = in_flight.clone();
        let max_in_flight = max_in_flight.clone();
        monitor.set_on_state_update_callback(move |_: &JointReport| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    let done = Arc::new(AtomicBool::new(false));
    thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                let _ = bus.publish("joint_states", common::report(&[("a", 0.1)]));
                thread::sleep(Duration::from_micros(200));
            }
        });
        s.spawn(|| {
            for _ in 0..50 {
                monitor.stop_state_monitor();
                thread::sleep(Duration::from_millis(1));
            }
        });
        s.spawn(|| {
            for _ in 0..50 {
                monitor.start_default().unwrap();
                assert!(bus.subscriber_count("joint_states") <= 1);
                thread::sleep(Duration::from_millis(1));
            }
            done.store(true, Ordering::Release);
        });
    });

    assert!(max_in_flight.load(Ordering::SeqCst) <= 1);
    assert!(bus.subscriber_count("joint_states") <= 1);
    monitor.clear_on_state_update_callback();
    monitor.stop_state_monitor();
}
