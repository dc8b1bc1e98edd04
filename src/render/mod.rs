//! 渲染模块
//!
//! - `surface` - 宿主渲染表面 trait 与混合模式
//! - `pass` - 作用域混合批次守卫
//! - `particle_renderer` - 活动集的批量绘制
//! - `sprite_batch` - 实例批次收集器（无设备的 `RenderSurface` 实现）

pub mod particle_renderer;
pub mod pass;
pub mod sprite_batch;
pub mod surface;

pub use particle_renderer::{DrawStats, ParticleRenderer};
pub use pass::BlendPass;
pub use sprite_batch::{QuadBatcher, SpriteBatch, SpriteInstance};
pub use surface::{BlendMode, ParticleQuad, RenderSurface};
