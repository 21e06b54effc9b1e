//! 集成测试辅助函数

#![allow(dead_code)]

use joint_state_sdk::model::{JointSpec, KinematicModel};
use joint_state_sdk::transport::{JointReport, JointSample};
use std::time::{Duration, Instant, SystemTime};

/// 六轴机械臂测试模型
pub fn arm6() -> KinematicModel {
    KinematicModel::new(
        "arm6",
        vec![
            JointSpec::new("joint1", -2.6, 2.6),
            JointSpec::new("joint2", 0.0, 3.1),
            JointSpec::new("joint3", -2.9, 0.0),
            JointSpec::new("joint4", -1.7, 1.7),
            JointSpec::new("joint5", -1.2, 1.2),
            JointSpec::new("joint6", -2.0, 2.0),
        ],
    )
    .expect("arm6 model is valid")
}

/// 两关节模型（限位 [-1, 1]）
pub fn two_joint() -> KinematicModel {
    KinematicModel::new(
        "two",
        vec![JointSpec::new("a", -1.0, 1.0), JointSpec::new("b", -1.0, 1.0)],
    )
    .expect("two-joint model is valid")
}

/// 以当前时间构造报告
pub fn report(pairs: &[(&str, f64)]) -> JointReport {
    report_at(SystemTime::now(), pairs)
}

/// 以指定时间构造报告
pub fn report_at(stamp: SystemTime, pairs: &[(&str, f64)]) -> JointReport {
    JointReport::new(
        stamp,
        pairs
            .iter()
            .map(|(name, position)| JointSample::new(*name, *position))
            .collect(),
    )
}

/// 轮询等待条件成立（最多 2 秒）
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}
