use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 默认活动集容量
pub const DEFAULT_CAPACITY: usize = 1200;

/// 粒子引擎配置
///
/// 容量属于静态配置，在 [`crate::particles::ParticleSystem`] 构造时确定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// 活动集容量（同时存活的最大粒子数）
    pub capacity: usize,

    /// 启动时预分配的空闲记录数
    pub prewarm: usize,

    /// 单个实例批次的最大四边形数
    pub max_batch_size: usize,
}

impl_default!(ParticleConfig {
    capacity: DEFAULT_CAPACITY,
    prewarm: 0,
    max_batch_size: 1024,
});

impl ParticleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定容量，其余使用默认值
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "Particle capacity must be greater than zero".to_string(),
            ));
        }
        if self.prewarm > self.capacity {
            return Err(ConfigError::ValidationError(format!(
                "Prewarm count {} exceeds capacity {}",
                self.prewarm, self.capacity
            )));
        }
        if self.max_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "Batch size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
