//! 粒子配置参数
//!
//! 特效代码用 [`ParticleDesc`] 描述一个粒子，然后通过
//! [`crate::particles::ParticleSystem::configure`] 写入已获取的记录。

use super::record::{Color, ParticleRecord};
use crate::render::surface::BlendMode;
use crate::resources::TextureHandle;
use glam::Vec2;

/// 粒子描述（构建器风格）
///
/// ```
/// use particle_fx::particles::{Color, ParticleDesc};
/// use particle_fx::resources::TextureHandle;
/// use glam::Vec2;
///
/// let desc = ParticleDesc::new(TextureHandle(0))
///     .at(Vec2::new(10.0, 4.0))
///     .velocity(Vec2::new(0.0, -2.0))
///     .color(Color::RED)
///     .gradient(Color::BLUE)
///     .lifetime(30)
///     .fade_out(true);
/// assert_eq!(desc.lifetime, 30);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleDesc {
    pub texture: Option<TextureHandle>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Color,
    /// 设置后启用渐变
    pub secondary_color: Option<Color>,
    pub scale: f32,
    pub scale_velocity: f32,
    pub rotation: f32,
    pub rotation_velocity: f32,
    pub drag: f32,
    pub gravity: f32,
    /// 总寿命（帧）
    pub lifetime: i32,
    pub fade_out: bool,
    pub shrink: bool,
    pub blend_mode: BlendMode,
}

impl Default for ParticleDesc {
    fn default() -> Self {
        Self {
            texture: None,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: Color::WHITE,
            secondary_color: None,
            scale: 1.0,
            scale_velocity: 0.0,
            rotation: 0.0,
            rotation_velocity: 0.0,
            drag: 1.0,
            gravity: 0.0,
            lifetime: 0,
            fade_out: false,
            shrink: false,
            blend_mode: BlendMode::Additive,
        }
    }
}

impl ParticleDesc {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn gradient(mut self, secondary: Color) -> Self {
        self.secondary_color = Some(secondary);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn scale_velocity(mut self, scale_velocity: f32) -> Self {
        self.scale_velocity = scale_velocity;
        self
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn rotation_velocity(mut self, rotation_velocity: f32) -> Self {
        self.rotation_velocity = rotation_velocity;
        self
    }

    pub fn drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn lifetime(mut self, frames: i32) -> Self {
        self.lifetime = frames;
        self
    }

    pub fn fade_out(mut self, fade_out: bool) -> Self {
        self.fade_out = fade_out;
        self
    }

    pub fn shrink(mut self, shrink: bool) -> Self {
        self.shrink = shrink;
        self
    }

    pub fn blend(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// 将描述写入记录的全部可配置字段
    pub fn apply(&self, record: &mut ParticleRecord) {
        if self.lifetime <= 0 {
            tracing::trace!(
                target: "particles",
                "Non-positive lifetime {} clamped to dead",
                self.lifetime
            );
        }

        record.texture = self.texture;
        record.position = self.position;
        record.velocity = self.velocity;
        record.color = self.color;
        record.secondary_color = self.secondary_color.unwrap_or(self.color);
        record.scale = self.scale;
        record.scale_velocity = self.scale_velocity;
        record.rotation = self.rotation;
        record.rotation_velocity = self.rotation_velocity;
        record.drag = self.drag;
        record.gravity = self.gravity;
        record.flags.fade_out = self.fade_out;
        record.flags.shrink = self.shrink;
        record.flags.use_gradient = self.secondary_color.is_some();
        record.blend_mode = self.blend_mode;
        record.set_lifetime(self.lifetime);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_gradient_flag() {
        let mut record = ParticleRecord::default();
        ParticleDesc::new(TextureHandle(3))
            .color(Color::RED)
            .gradient(Color::BLUE)
            .lifetime(12)
            .apply(&mut record);

        assert_eq!(record.texture, Some(TextureHandle(3)));
        assert!(record.flags.use_gradient);
        assert_eq!(record.secondary_color, Color::BLUE);
        assert_eq!(record.total_lifetime(), 12);
        assert_eq!(record.remaining_lifetime(), 12);
    }

    #[test]
    fn test_apply_without_gradient() {
        let mut record = ParticleRecord::default();
        ParticleDesc::new(TextureHandle(0))
            .color(Color::GREEN)
            .lifetime(0)
            .apply(&mut record);

        assert!(!record.flags.use_gradient);
        assert_eq!(record.secondary_color, Color::GREEN);
        assert!(record.is_dead());
    }
}
