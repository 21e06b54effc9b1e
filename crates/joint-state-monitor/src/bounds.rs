//! 限位容差与修正策略
//!
//! 传感器/编码器在限位附近的噪声会让读数略微越界。
//! 越界量不超过容差 `t` 时，值被修正到最近的限位；
//! 超过容差的值原样保存（不拒绝、不修正），只记录日志和计数。
//!
//! ```text
//!   min - t      min                  max      max + t
//!  ────┼──────────┼────────────────────┼──────────┼────
//!  原样 │ → min   │       原样          │ → max   │ 原样
//! ```

use joint_state_model::JointBounds;
use std::sync::atomic::{AtomicU64, Ordering};

/// 单个值的限位检查结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsCheck {
    /// 在 `[min, max]` 内，原样保存
    Within(f64),
    /// 越界但在容差内，修正为限位值
    Clamped(f64),
    /// 越界超过容差（或 NaN），原样保存
    OutOfTolerance(f64),
}

impl BoundsCheck {
    /// 最终写入状态的值
    pub fn value(self) -> f64 {
        match self {
            BoundsCheck::Within(v) | BoundsCheck::Clamped(v) | BoundsCheck::OutOfTolerance(v) => v,
        }
    }
}

/// 按容差策略检查并修正原始值
pub fn enforce_bounds(raw: f64, bounds: JointBounds, tolerance: f64) -> BoundsCheck {
    if bounds.contains(raw) {
        BoundsCheck::Within(raw)
    } else if raw < bounds.min && raw >= bounds.min - tolerance {
        BoundsCheck::Clamped(bounds.min)
    } else if raw > bounds.max && raw <= bounds.max + tolerance {
        BoundsCheck::Clamped(bounds.max)
    } else {
        BoundsCheck::OutOfTolerance(raw)
    }
}

/// 限位容差（原子版本，用于线程间共享）
///
/// 以 `f64` 的位模式存入 `AtomicU64`，写入时取绝对值，
/// 读取方总能看到最近一次写入的值。
#[derive(Debug)]
pub struct BoundsTolerance {
    bits: AtomicU64,
}

impl BoundsTolerance {
    pub fn new(tolerance: f64) -> Self {
        Self {
            bits: AtomicU64::new(tolerance.abs().to_bits()),
        }
    }

    /// 当前容差（非负）
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// 设置容差，保存 `abs(tolerance)`
    pub fn set(&self, tolerance: f64) {
        self.bits.store(tolerance.abs().to_bits(), Ordering::Release);
    }
}

impl Default for BoundsTolerance {
    fn default() -> Self {
        Self::new(0.0)
    }
}
