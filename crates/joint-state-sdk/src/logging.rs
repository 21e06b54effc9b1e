//! 日志初始化
//!
//! 库内部统一使用 `tracing` 宏输出日志，本身不安装任何 subscriber。
//! 应用程序可以调用 [`init_logger`] 安装一个默认的 fmt subscriber：
//!
//! - 过滤规则来自 `RUST_LOG` 环境变量，未设置时使用传入的默认规则
//! - 通过 `tracing-log` 桥接 `log` crate 的记录（第三方库的日志也能输出）
//!
//! ```no_run
//! joint_state_sdk::init_logger("joint_state_monitor=info");
//! ```

use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub const DEFAULT_LOG_FILTER: &str = "joint_state_monitor=info,joint_state_transport=warn";

/// 安装全局日志 subscriber
///
/// 返回是否由本次调用完成安装；已经安装过（无论是否由本函数安装）时返回 false。
pub fn init_logger(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }

    // log → tracing 桥接；其他地方已安装 logger 时忽略
    if tracing_log::LogTracer::init().is_err() {
        tracing::debug!("A `log` logger is already installed, skipping LogTracer");
    }

    log::debug!("Logger initialized with default filter '{}'", default_filter);
    true
}

/// 使用 [`DEFAULT_LOG_FILTER`] 安装全局日志 subscriber
pub fn init_default_logger() -> bool {
    init_logger(DEFAULT_LOG_FILTER)
}
