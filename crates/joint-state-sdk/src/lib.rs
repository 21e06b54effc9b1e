//! Joint State SDK - 关节状态监视 SDK
//!
//! 在多线程环境下维护机器人关节的“当前状态”：
//! 异步到达的关节报告被合并为一份完整的状态，规划器和控制器可以随时查询
//! 状态是否完整、是否足够新，并读取当前关节值。
//!
//! # 架构设计
//!
//! - **模型层** (`model`): 关节模型、限位、运动学状态、坐标变换接口
//! - **传输层** (`transport`): 关节报告与按 topic 订阅的抽象，内置进程内总线
//! - **监视层** (`monitor`): 状态合并、完整性/时效性查询、更新回调
//!
//! # 快速开始
//!
//! ```rust
//! use joint_state_sdk::prelude::*;
//! use joint_state_sdk::model::StaticTransforms;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let model = KinematicModel::new(
//!     "arm",
//!     vec![JointSpec::new("shoulder", -1.5, 1.5), JointSpec::new("elbow", 0.0, 2.5)],
//! )
//! .unwrap();
//! let transforms = StaticTransforms::new();
//! let bus = LocalBus::new();
//!
//! let monitor = MonitorBuilder::new()
//!     .transport(Arc::new(bus.clone()))
//!     .auto_start(true)
//!     .build(&model, &transforms)
//!     .unwrap();
//!
//! bus.publish(
//!     "joint_states",
//!     JointReport::now(vec![JointSample::new("shoulder", 0.3), JointSample::new("elbow", 1.0)]),
//! )
//! .unwrap();
//!
//! assert!(monitor.wait_for_complete_state(None, Duration::from_secs(1)));
//! let state = monitor.get_current_state();
//! assert_eq!(state.joint_value("elbow"), Some(1.0));
//! ```

pub mod logging;
pub mod prelude;

/// 模型层
pub mod model {
    pub use joint_state_model::*;
}

/// 传输层
pub mod transport {
    pub use joint_state_transport::*;
}

/// 监视层
pub mod monitor {
    pub use joint_state_monitor::*;
}

// --- 常用类型 ---

pub use joint_state_model::{JointModel, KinematicModel, KinematicState, ModelError};
pub use joint_state_monitor::{CurrentStateMonitor, MonitorBuilder, MonitorConfig, MonitorError};
pub use joint_state_transport::{JointReport, LocalBus, TransportError};
pub use logging::{DEFAULT_LOG_FILTER, init_default_logger, init_logger};
