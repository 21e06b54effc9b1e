//! 限位修正的属性测试
//!
//! 使用 proptest 验证容差策略在任意输入下的性质。

mod common;

use joint_state_sdk::model::{JointBounds, StaticTransforms};
use joint_state_sdk::monitor::{BoundsCheck, enforce_bounds};
use joint_state_sdk::{CurrentStateMonitor, LocalBus};
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    /// 限位内的值原样保存
    #[test]
    fn within_bounds_unchanged(raw in -1.0..=1.0f64, tol in 0.0..0.5f64) {
        let check = enforce_bounds(raw, JointBounds::new(-1.0, 1.0), tol);
        prop_assert_eq!(check, BoundsCheck::Within(raw));
    }

    /// 容差内的越界值被修正到最近的限位
    #[test]
    fn within_tolerance_clamped(excess in 1e-9..0.5f64, upper in any::<bool>()) {
        let tol = 0.5;
        let bounds = JointBounds::new(-1.0, 1.0);
        let (raw, expected) = if upper { (1.0 + excess, 1.0) } else { (-1.0 - excess, -1.0) };
        let check = enforce_bounds(raw, bounds, tol);
        prop_assert_eq!(check, BoundsCheck::Clamped(expected));
    }

    /// 超出容差的值原样保存
    #[test]
    fn beyond_tolerance_passes_through(excess in 0.51..100.0f64, upper in any::<bool>()) {
        let raw = if upper { 1.0 + excess } else { -1.0 - excess };
        let check = enforce_bounds(raw, JointBounds::new(-1.0, 1.0), 0.5);
        prop_assert_eq!(check, BoundsCheck::OutOfTolerance(raw));
    }

    /// 最终值要么是原值，要么是某个限位
    #[test]
    fn result_is_raw_or_bound(raw in -10.0..10.0f64, tol in 0.0..3.0f64) {
        let value = enforce_bounds(raw, JointBounds::new(-1.0, 1.0), tol).value();
        prop_assert!(value == raw || value == -1.0 || value == 1.0);
        prop_assert!((value - raw).abs() <= tol + 1e-9);
    }

    /// 容差符号不影响行为
    #[test]
    fn tolerance_sign_is_normalized(tol in 0.0..10.0f64) {
        let model = common::two_joint();
        let tf = StaticTransforms::new();
        let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(LocalBus::new())).unwrap();

        monitor.set_bounds_error(-tol);
        prop_assert_eq!(monitor.get_bounds_error(), tol);
        monitor.set_bounds_error(tol);
        prop_assert_eq!(monitor.get_bounds_error(), tol);
    }
}

#[test]
fn nan_passes_through_unchanged() {
    let check = enforce_bounds(f64::NAN, JointBounds::new(-1.0, 1.0), 1.0);
    assert!(matches!(check, BoundsCheck::OutOfTolerance(v) if v.is_nan()));
}

#[test]
fn monitor_applies_clamp_policy() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(LocalBus::new())).unwrap();
    monitor.set_bounds_error(0.1);

    let outcome = monitor.apply_report(&common::report(&[("a", 1.05), ("b", 1.5)]));
    assert_eq!(outcome.clamped, 1);
    assert_eq!(outcome.out_of_tolerance, 1);

    let values = monitor.get_current_state_values();
    assert_eq!(values["a"], 1.0);
    assert_eq!(values["b"], 1.5);

    let metrics = monitor.metrics();
    assert_eq!(metrics.values_clamped, 1);
    assert_eq!(metrics.values_out_of_tolerance, 1);
}

#[test]
fn zero_tolerance_still_accepts_exact_bounds() {
    let model = common::two_joint();
    let tf = StaticTransforms::new();
    let monitor = CurrentStateMonitor::new(&model, &tf, Arc::new(LocalBus::new())).unwrap();

    monitor.apply_report(&common::report(&[("a", -1.0), ("b", 1.0)]));
    let state = monitor.get_current_state();
    assert_eq!(state.joint_value("a"), Some(-1.0));
    assert_eq!(state.joint_value("b"), Some(1.0));
    assert!(state.satisfies_bounds());
}
