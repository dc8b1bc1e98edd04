//! 粒子批量渲染
//!
//! 每帧消费一次活动集：加法粒子在第一个作用域批次中绘制，alpha 粒子在第二个批次中绘制，
//! 结束后宿主的混合状态被恢复。

use super::pass::BlendPass;
use super::surface::{BlendMode, ParticleQuad, RenderSurface};
use crate::particles::{ActiveSet, ParticleRecord, RecyclingPool};
use crate::resources::TextureSource;
use glam::Vec2;

/// 单帧绘制统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// 提交的四边形数
    pub quads: usize,
    /// 因纹理不可用而跳过的粒子数
    pub skipped: usize,
    /// 开启的混合批次数
    pub passes: usize,
}

/// 粒子渲染服务
pub struct ParticleRenderer;

impl ParticleRenderer {
    /// 绘制活动集
    ///
    /// 活动集为空或没有任何已加载纹理时不产生任何调用。
    pub fn draw<S, T>(
        pool: &RecyclingPool,
        active: &ActiveSet,
        surface: &mut S,
        textures: &T,
        camera_offset: Vec2,
    ) -> DrawStats
    where
        S: RenderSurface + ?Sized,
        T: TextureSource + ?Sized,
    {
        let mut stats = DrawStats::default();
        if active.is_empty() || !textures.any_loaded() {
            return stats;
        }

        let mut has_alpha = false;
        {
            let mut pass = BlendPass::begin(surface, BlendMode::Additive);
            stats.passes += 1;
            for index in active.iter() {
                let record = pool.record(index);
                if record.blend_mode != BlendMode::Additive {
                    has_alpha = true;
                    continue;
                }
                match Self::quad_for(record, textures, camera_offset) {
                    Some(quad) => {
                        pass.draw(&quad);
                        stats.quads += 1;
                    }
                    None => stats.skipped += 1,
                }
            }
        }

        if has_alpha {
            let mut pass = BlendPass::begin(surface, BlendMode::Alpha);
            stats.passes += 1;
            for index in active.iter() {
                let record = pool.record(index);
                if record.blend_mode != BlendMode::Alpha {
                    continue;
                }
                match Self::quad_for(record, textures, camera_offset) {
                    Some(quad) => {
                        pass.draw(&quad);
                        stats.quads += 1;
                    }
                    None => stats.skipped += 1,
                }
            }
        }

        tracing::trace!(
            target: "particles.render",
            "Drew {} quads, skipped {}",
            stats.quads,
            stats.skipped
        );
        stats
    }

    /// 计算粒子的四边形；纹理缺失、未加载或粒子已死亡时返回 `None`
    pub fn quad_for<T>(record: &ParticleRecord, textures: &T, camera_offset: Vec2) -> Option<ParticleQuad>
    where
        T: TextureSource + ?Sized,
    {
        let texture = record.texture?;
        if record.is_dead() || !textures.is_loaded(texture) {
            return None;
        }

        Some(ParticleQuad {
            texture,
            center: record.position - camera_offset,
            rotation: record.rotation,
            scale: record.draw_scale(),
            tint: record.tint(),
        })
    }
}
