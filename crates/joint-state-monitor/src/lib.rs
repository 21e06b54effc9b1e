//! # Joint State Monitor
//!
//! 把异步、零散到达的关节状态报告合并为一份权威的“当前状态”，
//! 供任意线程查询完整性、时效性与当前值。
//!
//! ## 模块
//!
//! - `monitor`: [`CurrentStateMonitor`] 生命周期与查询接口
//! - `builder`: 链式构造 [`MonitorBuilder`]
//! - `state`: 规范状态（单锁保护的值表 + 时间戳表）
//! - `bounds`: 限位容差与修正策略
//! - `hooks`: 单槽位更新回调
//! - `metrics`: 原子计数指标
//! - `config`: TOML 配置
//!
//! ## 线程模型
//!
//! ```text
//! 传输层分发线程 ──▶ MonitorContext::apply_report()
//!                      ├─ 1. 锁内合并整条报告，notify 等待者
//!                      └─ 2. 锁外触发更新回调
//! 查询线程 ─────────▶ have_complete_state() / get_current_state() ...
//! ```
//!
//! 查询看到的永远是整条报告合并前或合并后的状态，不会看到一半。

mod builder;
pub mod bounds;
pub mod config;
pub mod context;
mod error;
pub mod hooks;
pub mod metrics;
mod monitor;
pub mod state;

pub use bounds::{BoundsCheck, BoundsTolerance, enforce_bounds};
pub use builder::MonitorBuilder;
pub use config::MonitorConfig;
pub use context::MonitorContext;
pub use error::MonitorError;
pub use hooks::{CallbackSlot, StateUpdateCallback};
pub use metrics::{MonitorMetrics, MonitorMetricsSnapshot};
pub use monitor::CurrentStateMonitor;
pub use state::{ApplyOutcome, StateAggregator};
