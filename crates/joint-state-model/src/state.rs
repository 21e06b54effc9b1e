//! 运动学状态
//!
//! 模型的结构化表示：按模型枚举顺序保存每个关节的值，
//! 通过名称索引访问（不持有指向其他结构的引用）。

use crate::bounds::JointBounds;
use crate::model::JointSpec;
use std::collections::HashMap;
use std::sync::Arc;

/// 运动学状态（关节名 → 关节值）
///
/// 关节集合在构造时确定，之后只有值会变化。
/// 名称索引通过 `Arc` 共享，Clone 开销只有值数组本身。
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicState {
    /// 关节名（模型枚举顺序）
    names: Arc<[String]>,
    /// 关节限位（与 `names` 一一对应）
    bounds: Arc<[JointBounds]>,
    /// 关节名 → 下标
    index: Arc<HashMap<String, usize>>,
    /// 关节值
    values: Vec<f64>,
}

impl KinematicState {
    /// 从关节列表创建默认状态
    pub fn from_joints(joints: &[JointSpec]) -> Self {
        let names: Arc<[String]> = joints.iter().map(|j| j.name.clone()).collect();
        let bounds: Arc<[JointBounds]> = joints.iter().map(|j| j.bounds).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let values = bounds.iter().map(JointBounds::default_value).collect();

        Self {
            names,
            bounds,
            index: Arc::new(index),
            values,
        }
    }

    /// 关节数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 关节名（模型枚举顺序）
    pub fn joint_names(&self) -> &[String] {
        &self.names
    }

    /// 关节名对应的下标
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// 读取单个关节值
    pub fn joint_value(&self, name: &str) -> Option<f64> {
        self.joint_index(name).map(|i| self.values[i])
    }

    /// 设置单个关节值
    ///
    /// 未知关节返回 `false`，状态不变。
    pub fn set_joint_value(&mut self, name: &str, value: f64) -> bool {
        match self.joint_index(name) {
            Some(i) => {
                self.values[i] = value;
                true
            },
            None => false,
        }
    }

    /// 批量设置关节值，返回实际生效的关节数
    pub fn set_variable_values(&mut self, values: &HashMap<String, f64>) -> usize {
        values
            .iter()
            .filter(|(name, value)| self.set_joint_value(name, **value))
            .count()
    }

    /// 按模型顺序的值切片
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 关节名 → 值 的拷贝
    pub fn to_map(&self) -> HashMap<String, f64> {
        self.names
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }

    /// 所有关节值是否都在各自限位内
    pub fn satisfies_bounds(&self) -> bool {
        self.bounds
            .iter()
            .zip(self.values.iter())
            .all(|(b, v)| b.contains(*v))
    }

    /// 超出限位的关节名（模型顺序）
    pub fn joints_out_of_bounds(&self) -> Vec<String> {
        self.names
            .iter()
            .zip(self.bounds.iter().zip(self.values.iter()))
            .filter(|(_, (b, v))| !b.contains(**v))
            .map(|(name, _)| name.clone())
            .collect()
    }
}
