//! Builder 模式实现
//!
//! 提供链式构造 `CurrentStateMonitor` 实例的便捷方式。

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::hooks::StateUpdateCallback;
use crate::monitor::CurrentStateMonitor;
use joint_state_model::{JointModel, TransformProvider};
use joint_state_transport::{JointStateTransport, LocalBus};
use std::path::Path;
use std::sync::Arc;

/// CurrentStateMonitor Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use joint_state_model::{JointSpec, KinematicModel, StaticTransforms};
/// use joint_state_monitor::MonitorBuilder;
/// use joint_state_transport::LocalBus;
/// use std::sync::Arc;
///
/// let model = KinematicModel::new("arm", vec![JointSpec::new("j1", -1.0, 1.0)]).unwrap();
/// let transforms = StaticTransforms::new();
/// let bus = LocalBus::new();
///
/// let monitor = MonitorBuilder::new()
///     .transport(Arc::new(bus.clone()))
///     .bounds_error(0.01)
///     .auto_start(true)
///     .build(&model, &transforms)
///     .unwrap();
/// assert!(monitor.is_active());
/// ```
pub struct MonitorBuilder {
    /// 基础配置
    config: MonitorConfig,
    /// 覆盖配置中的 topic
    topic: Option<String>,
    /// 覆盖配置中的限位容差
    bounds_error: Option<f64>,
    /// 传输层（未设置时按 `config.transport` 创建 `LocalBus`）
    transport: Option<Arc<dyn JointStateTransport>>,
    /// 初始更新回调
    callback: Option<Box<dyn StateUpdateCallback>>,
    /// 构建后立即开始监听
    auto_start: bool,
}

impl MonitorBuilder {
    pub fn new() -> Self {
        Self {
            config: MonitorConfig::default(),
            topic: None,
            bounds_error: None,
            transport: None,
            callback: None,
            auto_start: false,
        }
    }

    /// 设置基础配置
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// 从 TOML 文件加载基础配置
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, MonitorError> {
        self.config = MonitorConfig::load_from_file(path)?;
        Ok(self)
    }

    /// 设置监听的 topic（默认 `"joint_states"`）
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// 设置限位容差（取绝对值）
    pub fn bounds_error(mut self, error: f64) -> Self {
        self.bounds_error = Some(error);
        self
    }

    /// 使用指定传输层
    pub fn transport(mut self, transport: Arc<dyn JointStateTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 注册初始更新回调
    pub fn on_state_update(mut self, callback: impl StateUpdateCallback + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// 构建后是否立即在配置的 topic 上开始监听（默认 false）
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// 构建监视器
    ///
    /// # Errors
    /// - `MonitorError::Model`: 关节模型非法
    /// - `MonitorError::Transport`: `auto_start` 时订阅失败
    pub fn build<'a, M: JointModel + ?Sized>(
        self,
        model: &'a M,
        transforms: &'a dyn TransformProvider,
    ) -> Result<CurrentStateMonitor<'a, M>, MonitorError> {
        let mut config = self.config;
        if let Some(topic) = self.topic {
            config.joint_states_topic = topic;
        }
        if let Some(error) = self.bounds_error {
            config.bounds_error = error;
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(LocalBus::with_config(config.transport.clone())),
        };

        let monitor = CurrentStateMonitor::with_config(model, transforms, transport, config)?;
        if let Some(callback) = self.callback {
            monitor.context().callback.set_boxed(callback);
        }
        if self.auto_start {
            monitor.start_default()?;
        }
        Ok(monitor)
    }
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
