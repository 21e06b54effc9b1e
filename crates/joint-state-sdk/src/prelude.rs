//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use joint_state_sdk::prelude::*;
//! ```

// 监视器
pub use crate::monitor::{CurrentStateMonitor, MonitorBuilder, MonitorConfig};

// 模型（常用 Trait）
pub use crate::model::{JointModel, JointSpec, KinematicModel, KinematicState, TransformProvider};

// 传输层
pub use crate::transport::{JointReport, JointSample, JointStateTransport, LocalBus};

// 错误类型
pub use crate::model::ModelError;
pub use crate::monitor::MonitorError;
pub use crate::transport::TransportError;
