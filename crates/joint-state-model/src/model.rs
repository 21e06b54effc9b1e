//! 关节模型
//!
//! 提供 [`JointModel`] trait（枚举关节名及其限位）和一个基于数据的实现
//! [`KinematicModel`]，后者可从 TOML 文件加载：
//!
//! ```toml
//! name = "arm6"
//!
//! [[joints]]
//! name = "shoulder_pan"
//! min = -3.14
//! max = 3.14
//!
//! [[joints]]
//! name = "elbow"
//! min = 0.0
//! max = 2.5
//! ```

use crate::bounds::JointBounds;
use crate::error::ModelError;
use crate::state::KinematicState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 单个关节描述：名称 + 限位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    /// 关节名（模型内唯一）
    pub name: String,
    /// 关节限位
    #[serde(flatten)]
    pub bounds: JointBounds,
}

impl JointSpec {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            bounds: JointBounds::new(min, max),
        }
    }
}

/// 关节模型提供者
///
/// 只读接口，关节集合在监视器生命周期内保持稳定。
/// `joints()` 的顺序即为模型的枚举顺序，所有按关节输出的结果都遵循该顺序。
pub trait JointModel {
    /// 模型名称（用于日志）
    fn model_name(&self) -> &str;

    /// 按枚举顺序返回全部关节
    fn joints(&self) -> &[JointSpec];

    /// 按名称查找关节限位
    fn joint_bounds(&self, name: &str) -> Option<JointBounds> {
        self.joints()
            .iter()
            .find(|joint| joint.name == name)
            .map(|joint| joint.bounds)
    }

    /// 模型的结构化默认状态（每个关节取 [`JointBounds::default_value`]）
    fn default_state(&self) -> KinematicState {
        KinematicState::from_joints(self.joints())
    }

    /// 校验模型：关节名非空、不重复，限位合法
    fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for joint in self.joints() {
            if joint.name.is_empty() {
                return Err(ModelError::EmptyJointName);
            }
            if !seen.insert(joint.name.as_str()) {
                return Err(ModelError::DuplicateJoint(joint.name.clone()));
            }
            if !joint.bounds.is_valid() {
                return Err(ModelError::InvalidBounds {
                    joint: joint.name.clone(),
                    min: joint.bounds.min,
                    max: joint.bounds.max,
                });
            }
        }
        Ok(())
    }
}

/// 基于数据的关节模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicModel {
    /// 模型名称
    pub name: String,
    /// 关节列表（顺序即枚举顺序）
    #[serde(default)]
    pub joints: Vec<JointSpec>,
}

impl KinematicModel {
    /// 创建模型并校验
    pub fn new(name: impl Into<String>, joints: Vec<JointSpec>) -> Result<Self, ModelError> {
        let model = Self {
            name: name.into(),
            joints,
        };
        model.validate()?;
        Ok(model)
    }

    /// 从 TOML 字符串解析模型
    pub fn from_toml_str(content: &str) -> Result<Self, ModelError> {
        let model: KinematicModel = toml::from_str(content)?;
        model.validate()?;
        Ok(model)
    }

    /// 从 TOML 文件加载模型
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl JointModel for KinematicModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn joints(&self) -> &[JointSpec] {
        &self.joints
    }
}
