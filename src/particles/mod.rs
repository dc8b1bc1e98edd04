//! 粒子池与生命周期模块
//!
//! ## 架构设计
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ParticleSystem                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  RecyclingPool   槽位数组 + free-list + 代数句柄          │
//! │  ActiveSet       容量固定，swap-remove 移除               │
//! │  tick()          位移 → 阻尼/重力 → 旋转/缩放 → 老化      │
//! │  draw()          加法批次 → alpha 批次 → 恢复宿主状态     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```rust
//! use particle_fx::particles::{Color, ParticleDesc, ParticleSystem};
//! use particle_fx::resources::TextureHandle;
//! use glam::Vec2;
//!
//! let mut system = ParticleSystem::new(1200);
//!
//! let handle = system.acquire();
//! let handle = system.configure(
//!     handle,
//!     &ParticleDesc::new(TextureHandle(0))
//!         .velocity(Vec2::new(1.0, 0.0))
//!         .color(Color::WHITE)
//!         .lifetime(2),
//! );
//! system.submit(handle);
//!
//! system.tick();
//! assert_eq!(system.get(handle).unwrap().position, Vec2::new(1.0, 0.0));
//! system.tick();
//! assert_eq!(system.live_count(), 0);
//! ```

pub mod active;
pub mod desc;
pub mod pool;
pub mod record;
pub mod system;

pub use active::ActiveSet;
pub use desc::ParticleDesc;
pub use pool::{Owner, ParticleHandle, PoolStats, RecyclingPool};
pub use record::{Color, ParticleFlags, ParticleRecord};
pub use system::{Admission, ParticleStats, ParticleSystem};
