//! 模型层错误类型定义

use thiserror::Error;

/// 模型层错误类型
#[derive(Error, Debug)]
pub enum ModelError {
    /// 关节名为空
    #[error("Joint name cannot be empty")]
    EmptyJointName,

    /// 关节名重复
    #[error("Duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// 限位非法（`min > max` 或非有限值）
    #[error("Invalid bounds for joint '{joint}': [{min}, {max}]")]
    InvalidBounds { joint: String, min: f64, max: f64 },

    /// 模型文件读取失败
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    /// 模型文件解析失败
    #[error("Model config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// 坐标变换查询失败
    #[error("No transform from '{source_frame}' to '{target_frame}'")]
    TransformUnavailable {
        target_frame: String,
        source_frame: String,
    },
}
