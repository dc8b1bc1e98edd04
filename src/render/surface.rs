//! 宿主渲染表面抽象
//!
//! 粒子引擎不直接持有图形设备。宿主实现 [`RenderSurface`]，
//! 引擎在其上开启/结束混合批次并提交纹理四边形。

use crate::particles::Color;
use crate::resources::TextureHandle;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 混合模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    /// 加法混合（与顺序无关）
    #[default]
    Additive,
    /// 普通 alpha 混合
    Alpha,
}

/// 待绘制的粒子四边形
///
/// 以 `center` 为中心（已减去相机偏移），按 `rotation` 旋转、按 `scale` 缩放。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleQuad {
    pub texture: TextureHandle,
    pub center: Vec2,
    pub rotation: f32,
    pub scale: f32,
    /// 派生颜色 × 派生透明度
    pub tint: Color,
}

/// 渲染表面
///
/// 语义与常见的 2D 精灵批处理一致：同一时刻至多一个打开的批次，
/// `begin_batch` 与 `end_batch` 必须成对出现。
pub trait RenderSurface {
    /// 当前打开的批次的混合模式；没有打开的批次时返回 `None`
    fn active_blend(&self) -> Option<BlendMode>;

    /// 以指定混合模式开启批次
    fn begin_batch(&mut self, mode: BlendMode);

    /// 结束当前批次
    fn end_batch(&mut self);

    /// 在当前批次中绘制四边形
    fn draw_quad(&mut self, quad: &ParticleQuad);
}
