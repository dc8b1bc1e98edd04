//! # Particle FX
//!
//! 实时 2D 游戏的粒子特效核心：固定容量的粒子对象池、逐帧生命周期推进，
//! 以及按混合模式分批的渲染。
//!
//! ## Features
//!
//! - **Recycling Pool**: 槽位数组 + free-list，稳态下零分配；代数句柄检测过期引用
//! - **Active Set**: 容量固定，满时静默丢弃新粒子并计数
//! - **Lifecycle**: 每帧一次的同步 `tick`，swap-remove 回收
//! - **Rendering**: 作用域混合批次，绘制后恢复宿主混合状态
//! - **ECS**: `ParticleSystem` 可作为 `bevy_ecs` 资源使用
//!
//! ## Architecture Design
//!
//! 遵循 **贫血模型** 分层：
//! - **State (Resource)**: `ParticleSystem`、`ParticleSpawnQueue` 等纯数据
//! - **Service**: `ParticleRenderer` 等以静态方法封装逻辑
//! - **System**: `ecs` 模块中的调度函数
//!
//! ### Example
//!
//! ```rust
//! use particle_fx::particles::{Color, ParticleDesc, ParticleSystem};
//! use particle_fx::render::QuadBatcher;
//! use particle_fx::resources::TextureTable;
//! use glam::{UVec2, Vec2};
//!
//! let mut textures = TextureTable::new();
//! let spark = textures.register("spark");
//! textures.mark_loaded(spark, UVec2::new(16, 16)).unwrap();
//!
//! let mut particles = ParticleSystem::new(1200);
//! particles.spawn(
//!     &ParticleDesc::new(spark)
//!         .color(Color::RED)
//!         .gradient(Color::BLUE)
//!         .lifetime(30)
//!         .fade_out(true),
//! );
//!
//! // 每帧：先模拟，再绘制
//! let mut surface = QuadBatcher::new(1024);
//! particles.tick();
//! let stats = particles.draw(&mut surface, &textures, Vec2::ZERO);
//! assert_eq!(stats.quads, 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: 错误类型、日志、宏
//! - [`config`]: 配置加载
//! - [`particles`]: 粒子记录、回收池、活动集、生命周期
//! - [`render`]: 混合批次与批量绘制
//! - [`resources`]: 纹理句柄与纹理表
//! - [`ecs`]: bevy_ecs 集成

/// Core infrastructure: errors, logging, macros
pub mod core;
/// Configuration system
pub mod config;
/// Particle pool, active set and lifecycle scheduling
pub mod particles;
/// Blend-batched rendering against a host surface
pub mod render;
/// Texture handles and load-state lookup
pub mod resources;
/// bevy_ecs integration
pub mod ecs;

pub use crate::config::{EffectsConfig, ParticleConfig};
pub use crate::core::error::{EffectsError, EffectsResult};
pub use crate::particles::{Admission, ParticleDesc, ParticleHandle, ParticleSystem};
pub use crate::render::{BlendMode, RenderSurface};
pub use crate::resources::{TextureHandle, TextureSource};
