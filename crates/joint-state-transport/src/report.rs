//! 关节状态报告

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// 单个关节采样
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    /// 关节名
    pub name: String,
    /// 原始值（未经限位修正）
    pub position: f64,
}

impl JointSample {
    pub fn new(name: impl Into<String>, position: f64) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// 关节状态报告
///
/// 一次异步投递：若干关节的原始采样 + 同一个时间戳。
/// 报告可以只覆盖部分关节，也可能包含模型中不存在的关节。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointReport {
    /// 采样时间（发送方时钟）
    pub stamp: SystemTime,
    /// 关节采样（保持发送顺序）
    pub samples: Vec<JointSample>,
}

impl JointReport {
    pub fn new(stamp: SystemTime, samples: Vec<JointSample>) -> Self {
        Self { stamp, samples }
    }

    /// 以当前系统时间作为时间戳创建报告
    pub fn now(samples: Vec<JointSample>) -> Self {
        Self::new(SystemTime::now(), samples)
    }

    /// 从 (关节名, 值) 对创建报告
    pub fn from_pairs<I, S>(stamp: SystemTime, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::new(
            stamp,
            pairs
                .into_iter()
                .map(|(name, position)| JointSample::new(name, position))
                .collect(),
        )
    }

    /// 采样数量
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 报告中某关节的原始值（若出现多次，取最后一次）
    pub fn position_of(&self, name: &str) -> Option<f64> {
        self.samples
            .iter()
            .rev()
            .find(|s| s.name == name)
            .map(|s| s.position)
    }
}
