//! 粒子记录
//!
//! 对象池拥有的可复用粒子状态块。每次获取时重置为默认值，
//! 提交后只由 `tick` 修改。

use crate::render::surface::BlendMode;
use crate::resources::TextureHandle;
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// RGBA 颜色（线性空间，分量范围 0..=1）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// 线性插值，`t` 被限制在 0..=1
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::from(self.to_vec4().lerp(other.to_vec4(), t.clamp(0.0, 1.0)))
    }

    /// 所有分量（含 alpha）乘以 `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self::from(self.to_vec4() * factor)
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

/// 粒子外观标志
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleFlags {
    /// 随生命周期淡出
    pub fade_out: bool,
    /// 随生命周期缩小（最多缩小一半）
    pub shrink: bool,
    /// 主色到副色渐变
    pub use_gradient: bool,
}

/// 粒子记录
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleRecord {
    pub position: Vec2,
    pub velocity: Vec2,
    /// 主色
    pub color: Color,
    /// 副色（仅在 `use_gradient` 时使用）
    pub secondary_color: Color,
    pub scale: f32,
    pub scale_velocity: f32,
    /// 旋转角（弧度）
    pub rotation: f32,
    pub rotation_velocity: f32,
    /// 每帧速度乘数，1.0 表示无阻尼
    pub drag: f32,
    /// 每帧叠加到 `velocity.y` 的量
    pub gravity: f32,
    pub texture: Option<TextureHandle>,
    pub flags: ParticleFlags,
    pub blend_mode: BlendMode,
    remaining_lifetime: i32,
    total_lifetime: i32,
}

impl Default for ParticleRecord {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: Color::WHITE,
            secondary_color: Color::WHITE,
            scale: 1.0,
            scale_velocity: 0.0,
            rotation: 0.0,
            rotation_velocity: 0.0,
            drag: 1.0,
            gravity: 0.0,
            texture: None,
            flags: ParticleFlags::default(),
            blend_mode: BlendMode::Additive,
            remaining_lifetime: 0,
            total_lifetime: 0,
        }
    }
}

impl ParticleRecord {
    /// 重置为默认值
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 设置总寿命（帧数），剩余寿命同步重置
    ///
    /// 非正值被钳制为“已死亡”：下一次 `tick` 即回收。
    pub fn set_lifetime(&mut self, frames: i32) {
        let frames = frames.max(0);
        self.total_lifetime = frames;
        self.remaining_lifetime = frames;
    }

    pub fn remaining_lifetime(&self) -> i32 {
        self.remaining_lifetime
    }

    pub fn total_lifetime(&self) -> i32 {
        self.total_lifetime
    }

    pub fn is_dead(&self) -> bool {
        self.remaining_lifetime <= 0
    }

    /// 生命周期进度 `t = 1 - remaining / total`，范围 0..=1
    pub fn progress(&self) -> f32 {
        if self.total_lifetime <= 0 {
            return 1.0;
        }
        (1.0 - self.remaining_lifetime as f32 / self.total_lifetime as f32).clamp(0.0, 1.0)
    }

    /// 派生透明度
    pub fn alpha(&self) -> f32 {
        if self.flags.fade_out {
            1.0 - self.progress()
        } else {
            1.0
        }
    }

    /// 派生缩放
    pub fn draw_scale(&self) -> f32 {
        if self.flags.shrink {
            self.scale * (1.0 - 0.5 * self.progress())
        } else {
            self.scale
        }
    }

    /// 派生颜色
    pub fn draw_color(&self) -> Color {
        if self.flags.use_gradient {
            self.color.lerp(self.secondary_color, self.progress())
        } else {
            self.color
        }
    }

    /// 最终着色：派生颜色 × 派生透明度
    pub fn tint(&self) -> Color {
        self.draw_color().scaled(self.alpha())
    }

    /// 推进一帧，返回推进后是否死亡
    pub fn advance(&mut self) -> bool {
        self.position += self.velocity;
        self.velocity *= self.drag;
        self.velocity.y += self.gravity;
        self.rotation += self.rotation_velocity;
        self.scale += self.scale_velocity;
        self.remaining_lifetime -= 1;
        self.is_dead()
    }
}
