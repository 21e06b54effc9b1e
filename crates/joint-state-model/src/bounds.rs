//! 关节限位

use serde::{Deserialize, Serialize};

/// 关节限位 `[min, max]`（弧度或米，取决于关节类型）
///
/// 由模型提供，构造后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointBounds {
    /// 下限
    pub min: f64,
    /// 上限
    pub max: f64,
}

impl JointBounds {
    /// 创建限位（不做校验，校验见 [`JointBounds::is_valid`]）
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// 无限位关节（如连续旋转关节）
    pub const fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    /// 限位是否合法
    ///
    /// `min <= max` 且两者都不是 NaN。无穷值允许（用于无限位关节）。
    pub fn is_valid(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan() && self.min <= self.max
    }

    /// 值是否在 `[min, max]` 内（含端点）
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// 默认值：0 在限位内则取 0，否则取限位中点
    ///
    /// 单侧无限位时取有限的那一侧。
    pub fn default_value(&self) -> f64 {
        if self.contains(0.0) {
            return 0.0;
        }
        match (self.min.is_finite(), self.max.is_finite()) {
            (true, true) => (self.min + self.max) / 2.0,
            (true, false) => self.min,
            (false, true) => self.max,
            (false, false) => 0.0,
        }
    }
}

impl Default for JointBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}
