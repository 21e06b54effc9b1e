//! 状态聚合器
//!
//! 维护规范状态：每个模型关节的最新值与最近一次更新时间。
//!
//! # 同步机制
//!
//! 值和时间戳放在同一个 `Mutex<JointTable>` 中：
//! - 一条报告（可能包含多个关节）在一次加锁内整体合并，
//!   读取方不会观察到"合并了一半"的报告
//! - 查询在同一把锁内完成，保证跨关节的一致快照
//! - 每次合并后通过 `Condvar` 唤醒 `wait_for_complete_state` 的等待者
//!
//! 关节集合在构造时确定，之后只有值和时间戳会变化。

use crate::bounds::{BoundsCheck, enforce_bounds};
use joint_state_model::{JointBounds, JointSpec, KinematicState};
use joint_state_transport::JointReport;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, warn};

/// 一条报告的合并结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// 写入状态的采样数（含被修正的）
    pub applied: usize,
    /// 关节不在模型中而被丢弃的采样数
    pub ignored: usize,
    /// 在容差内被修正到限位的采样数
    pub clamped: usize,
    /// 越界超过容差、原样保存的采样数
    pub out_of_tolerance: usize,
}

/// 受锁保护的关节表（按模型顺序）
#[derive(Debug)]
struct JointTable {
    values: Vec<f64>,
    /// `None` 表示该关节从未收到数据
    stamps: Vec<Option<SystemTime>>,
}

/// 状态聚合器
#[derive(Debug)]
pub struct StateAggregator {
    /// 关节名（模型枚举顺序）
    names: Arc<[String]>,
    /// 关节限位（与 `names` 一一对应）
    bounds: Arc<[JointBounds]>,
    /// 关节名 → 下标
    index: HashMap<String, usize>,
    table: Mutex<JointTable>,
    updated: Condvar,
}

impl StateAggregator {
    /// 按模型关节创建聚合器，值取各关节默认值，无时间戳
    pub fn new(joints: &[JointSpec]) -> Self {
        let names: Arc<[String]> = joints.iter().map(|j| j.name.clone()).collect();
        let bounds: Arc<[JointBounds]> = joints.iter().map(|j| j.bounds).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self {
            table: Mutex::new(JointTable {
                values: bounds.iter().map(JointBounds::default_value).collect(),
                stamps: vec![None; names.len()],
            }),
            names,
            bounds,
            index,
            updated: Condvar::new(),
        }
    }

    /// 关节名（模型枚举顺序）
    pub fn joint_names(&self) -> &[String] {
        &self.names
    }

    pub fn joint_count(&self) -> usize {
        self.names.len()
    }

    /// 合并一条报告（临界区）
    ///
    /// 未知关节被静默丢弃；已知关节按容差策略修正后写入，
    /// 时间戳设为报告时间戳。整条报告在一次加锁内完成。
    pub fn merge(&self, report: &JointReport, tolerance: f64) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        {
            let mut table = self.table.lock();
            for sample in &report.samples {
                let Some(&i) = self.index.get(&sample.name) else {
                    outcome.ignored += 1;
                    debug!("Ignoring sample for unknown joint '{}'", sample.name);
                    continue;
                };

                let check = enforce_bounds(sample.position, self.bounds[i], tolerance);
                match check {
                    BoundsCheck::Within(_) => {},
                    BoundsCheck::Clamped(_) => outcome.clamped += 1,
                    BoundsCheck::OutOfTolerance(value) => {
                        outcome.out_of_tolerance += 1;
                        warn!(
                            "Joint '{}' value {} is outside bounds [{}, {}] beyond tolerance {}",
                            sample.name, value, self.bounds[i].min, self.bounds[i].max, tolerance
                        );
                    },
                }

                table.values[i] = check.value();
                table.stamps[i] = Some(report.stamp);
                outcome.applied += 1;
            }
        }

        if outcome.applied > 0 {
            self.updated.notify_all();
        }
        outcome
    }

    /// 完整性查询
    ///
    /// 所有关节都有时间戳，且（给定 `max_age` 时）时间戳不早于 `now - max_age`，返回 true。
    /// 给定 `missing` 时先清空，再按模型顺序填入缺失或过期的关节名。
    pub fn have_complete_state(
        &self,
        now: SystemTime,
        max_age: Option<Duration>,
        missing: Option<&mut Vec<String>>,
    ) -> bool {
        let table = self.table.lock();
        self.evaluate(&table, now, max_age, missing)
    }

    fn evaluate(
        &self,
        table: &JointTable,
        now: SystemTime,
        max_age: Option<Duration>,
        mut missing: Option<&mut Vec<String>>,
    ) -> bool {
        if let Some(list) = missing.as_deref_mut() {
            list.clear();
        }

        // max_age 超过 now 可表示的范围时，所有时间戳都算新鲜
        let oldest_allowed = max_age.and_then(|age| now.checked_sub(age));

        let mut complete = true;
        for (name, stamp) in self.names.iter().zip(table.stamps.iter()) {
            let fresh = match stamp {
                None => false,
                Some(stamp) => oldest_allowed.is_none_or(|limit| *stamp >= limit),
            };
            if fresh {
                continue;
            }

            complete = false;
            match missing.as_deref_mut() {
                Some(list) => list.push(name.clone()),
                None => break,
            }
        }
        complete
    }

    /// 阻塞等待状态完整（且新鲜），超时返回 false
    ///
    /// 每次合并后都会被唤醒重新检查；`max_age` 的判断基于唤醒时刻的系统时间。
    /// `timeout` 大到无法表示截止时刻时（如 `Duration::MAX`）一直等待。
    pub fn wait_for_complete_state(&self, max_age: Option<Duration>, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut table = self.table.lock();
        loop {
            if self.evaluate(&table, SystemTime::now(), max_age, None) {
                return true;
            }
            match deadline {
                Some(deadline) => {
                    if self.updated.wait_until(&mut table, deadline).timed_out() {
                        return self.evaluate(&table, SystemTime::now(), max_age, None);
                    }
                },
                None => self.updated.wait(&mut table),
            }
        }
    }

    /// 关节名 → 值 的拷贝
    pub fn values(&self) -> HashMap<String, f64> {
        let table = self.table.lock();
        self.names
            .iter()
            .cloned()
            .zip(table.values.iter().copied())
            .collect()
    }

    /// 单个关节的当前值
    pub fn joint_value(&self, name: &str) -> Option<f64> {
        let i = *self.index.get(name)?;
        Some(self.table.lock().values[i])
    }

    /// 把当前值写入结构化状态（只写入双方都有的关节）
    pub fn fill_state(&self, state: &mut KinematicState) {
        let table = self.table.lock();
        for (name, value) in self.names.iter().zip(table.values.iter()) {
            state.set_joint_value(name, *value);
        }
    }

    /// 已收到数据的关节 → 最近更新时间
    pub fn last_update_times(&self) -> HashMap<String, SystemTime> {
        let table = self.table.lock();
        self.names
            .iter()
            .zip(table.stamps.iter())
            .filter_map(|(name, stamp)| stamp.map(|s| (name.clone(), s)))
            .collect()
    }

    /// 所有关节中最新的更新时间
    pub fn latest_update_time(&self) -> Option<SystemTime> {
        self.table.lock().stamps.iter().flatten().max().copied()
    }
}
