//! 坐标变换提供者
//!
//! 监视器本身不做任何坐标变换计算，只在构造时借用一个提供者，
//! 供依赖变换的上层代码通过 `CurrentStateMonitor::transforms()` 取用。

use crate::error::ModelError;
use nalgebra::Isometry3;
use std::collections::HashMap;

/// 坐标变换提供者接口
///
/// 实现者负责维护帧之间的变换（例如来自 TF 树或静态标定）。
pub trait TransformProvider: Send + Sync {
    /// 查询 `source_frame` 到 `target_frame` 的变换
    fn lookup_transform(
        &self,
        target_frame: &str,
        source_frame: &str,
    ) -> Result<Isometry3<f64>, ModelError>;

    /// 是否可以查询到该变换
    fn can_transform(&self, target_frame: &str, source_frame: &str) -> bool {
        self.lookup_transform(target_frame, source_frame).is_ok()
    }
}

/// 静态变换表
///
/// 支持直接查询、逆变换查询以及同一帧的单位变换。
#[derive(Debug, Clone, Default)]
pub struct StaticTransforms {
    /// (target, source) → 变换
    transforms: HashMap<(String, String), Isometry3<f64>>,
}

impl StaticTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记 `source_frame` 到 `target_frame` 的变换
    pub fn insert(
        &mut self,
        target_frame: impl Into<String>,
        source_frame: impl Into<String>,
        transform: Isometry3<f64>,
    ) {
        self.transforms
            .insert((target_frame.into(), source_frame.into()), transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl TransformProvider for StaticTransforms {
    fn lookup_transform(
        &self,
        target_frame: &str,
        source_frame: &str,
    ) -> Result<Isometry3<f64>, ModelError> {
        if target_frame == source_frame {
            return Ok(Isometry3::identity());
        }
        let key = (target_frame.to_string(), source_frame.to_string());
        if let Some(t) = self.transforms.get(&key) {
            return Ok(*t);
        }
        let inverse_key = (source_frame.to_string(), target_frame.to_string());
        if let Some(t) = self.transforms.get(&inverse_key) {
            return Ok(t.inverse());
        }
        Err(ModelError::TransformUnavailable {
            target_frame: target_frame.to_string(),
            source_frame: source_frame.to_string(),
        })
    }
}
