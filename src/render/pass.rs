//! 作用域混合批次
//!
//! [`BlendPass`] 在创建时结束宿主当前批次并开启指定混合模式的批次，
//! 在 drop 时结束自己的批次并恢复宿主原先的混合状态。
//! 任何退出路径（包括提前返回与 panic 展开）都会恢复。

use super::surface::{BlendMode, ParticleQuad, RenderSurface};

/// 作用域混合批次守卫
pub struct BlendPass<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
    mode: BlendMode,
    restore: Option<BlendMode>,
    quads: usize,
}

impl<'a, S: RenderSurface + ?Sized> BlendPass<'a, S> {
    /// 开启作用域批次
    pub fn begin(surface: &'a mut S, mode: BlendMode) -> Self {
        let restore = surface.active_blend();
        if restore.is_some() {
            surface.end_batch();
        }
        surface.begin_batch(mode);
        tracing::trace!(target: "particles.render", "Begin {:?} pass (restore {:?})", mode, restore);

        Self {
            surface,
            mode,
            restore,
            quads: 0,
        }
    }

    pub fn draw(&mut self, quad: &ParticleQuad) {
        self.surface.draw_quad(quad);
        self.quads += 1;
    }

    pub fn mode(&self) -> BlendMode {
        self.mode
    }

    /// 本批次已绘制的四边形数
    pub fn quad_count(&self) -> usize {
        self.quads
    }
}

impl<S: RenderSurface + ?Sized> Drop for BlendPass<'_, S> {
    fn drop(&mut self) {
        self.surface.end_batch();
        if let Some(mode) = self.restore {
            self.surface.begin_batch(mode);
        }
    }
}
