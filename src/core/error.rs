//! 统一错误处理模块
//!
//! 提供粒子引擎范围内的统一错误类型定义
//!
//! ## 错误处理策略
//!
//! 对外的帧循环接口（`acquire` / `configure` / `submit` / `tick` / `draw`）从不返回错误：
//! 所有退化输入都在本地吸收并记录日志。以下错误类型只出现在 `try_*` 系列接口、
//! 资源表和配置加载中。

use crate::config::ConfigError;
use thiserror::Error;

/// 粒子引擎顶层错误类型
#[derive(Error, Debug)]
pub enum EffectsError {
    #[error("Particle error: {0}")]
    Particle(#[from] ParticleError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// 粒子句柄与生命周期错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticleError {
    /// 句柄所指向的槽位已被回收（代数不匹配）
    #[error("Stale particle handle: slot {index}, generation {generation}")]
    StaleHandle { index: u32, generation: u32 },

    /// 句柄索引超出对象池范围
    #[error("Particle handle out of range: slot {index}")]
    OutOfRange { index: u32 },

    /// 槽位状态不允许该操作（例如配置已提交的粒子）
    #[error("Particle slot {index} is {found}, expected {expected}")]
    InvalidState {
        index: u32,
        expected: &'static str,
        found: &'static str,
    },
}

/// 资源管理错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Texture not found: {name}")]
    NotFound { name: String },

    #[error("Unknown texture handle: {0}")]
    UnknownHandle(u32),

    #[error("Failed to load texture: {name}, reason: {reason}")]
    LoadFailed { name: String, reason: String },
}

/// 结果类型别名
pub type EffectsResult<T> = Result<T, EffectsError>;
pub type ParticleResult<T> = Result<T, ParticleError>;
pub type AssetResult<T> = Result<T, AssetError>;
