//! # Joint State Model
//!
//! 机器人关节模型的边界类型定义（无传输层、无线程依赖）
//!
//! ## 模块
//!
//! - `bounds`: 关节限位 `[min, max]`
//! - `model`: 关节模型 trait 与基于 TOML 的 `KinematicModel`
//! - `state`: 运动学状态（关节名 → 关节值的结构化表示）
//! - `transform`: 坐标变换提供者接口
//! - `error`: 模型层错误类型
//!
//! ## 在架构中的位置
//!
//! ```text
//! joint-state-model (此 crate)
//!     ↓ JointModel / KinematicState
//! joint-state-transport
//!     ↓ JointReport
//! joint-state-monitor
//! ```

pub mod bounds;
pub mod error;
pub mod model;
pub mod state;
pub mod transform;

// 重新导出常用类型
pub use bounds::JointBounds;
pub use error::ModelError;
pub use model::{JointModel, JointSpec, KinematicModel};
pub use state::KinematicState;
pub use transform::{StaticTransforms, TransformProvider};
