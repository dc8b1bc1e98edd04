//! 日志系统初始化
//!
//! 基于 `tracing` + `tracing-subscriber`。日志级别优先由 `RUST_LOG` 环境变量控制，
//! 未设置时回退到 [`LoggingConfig`] 中配置的级别。

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// 初始化日志系统
///
/// 可重复调用：若全局订阅者已安装，后续调用不做任何事。
pub fn initialize_logging(config: &LoggingConfig) {
    if !config.log_to_console {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
    tracing::info!(target: "particle_fx", "Logging initialized at {:?}", config.level);
}
