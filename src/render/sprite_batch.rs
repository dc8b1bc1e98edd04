use super::surface::{BlendMode, ParticleQuad, RenderSurface};
use glam::{Mat4, Quat, Vec3, Vec4};

/// 精灵实例数据
///
/// 布局可直接上传为 GPU 实例缓冲区。
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    /// 变换矩阵 (4x4)，单位四边形中心位于原点
    pub transform: [[f32; 4]; 4],
    /// 纹理坐标 (x, y, width, height)
    pub tex_coords: [f32; 4],
    /// 颜色 (RGBA)
    pub color: [f32; 4],
    /// 纹理句柄索引
    pub texture: u32,
    _padding: [u32; 3],
}

impl SpriteInstance {
    /// 创建新的精灵实例
    pub fn new(position: Vec3, size: f32, rotation: f32, tex_coords: Vec4, color: Vec4, texture: u32) -> Self {
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::new(size, size, 1.0),
            Quat::from_rotation_z(rotation),
            position,
        );

        Self {
            transform: transform.to_cols_array_2d(),
            tex_coords: tex_coords.to_array(),
            color: color.to_array(),
            texture,
            _padding: [0; 3],
        }
    }

    /// 由粒子四边形构造（整张纹理）
    pub fn from_quad(quad: &ParticleQuad) -> Self {
        Self::new(
            quad.center.extend(0.0),
            quad.scale,
            quad.rotation,
            Vec4::new(0.0, 0.0, 1.0, 1.0),
            quad.tint.to_vec4(),
            quad.texture.index(),
        )
    }

    /// 实例中心位置
    pub fn position(&self) -> Vec3 {
        Mat4::from_cols_array_2d(&self.transform).w_axis.truncate()
    }
}

/// 精灵批次
#[derive(Debug, Clone)]
pub struct SpriteBatch {
    /// 混合模式
    mode: BlendMode,
    /// 精灵实例
    instances: Vec<SpriteInstance>,
    /// 最大批次大小
    max_batch_size: usize,
}

impl SpriteBatch {
    /// 创建新的精灵批次
    pub fn new(mode: BlendMode, max_batch_size: usize) -> Self {
        Self {
            mode,
            instances: Vec::with_capacity(max_batch_size),
            max_batch_size,
        }
    }

    /// 添加精灵实例
    pub fn add(&mut self, instance: SpriteInstance) -> bool {
        if self.instances.len() >= self.max_batch_size {
            return false;
        }

        self.instances.push(instance);
        true
    }

    /// 清空批次
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn mode(&self) -> BlendMode {
        self.mode
    }

    /// 实例切片，可直接 `bytemuck::cast_slice` 上传
    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    /// 获取实例数量
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// 检查批次是否为空
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// 检查批次是否已满
    pub fn is_full(&self) -> bool {
        self.instances.len() >= self.max_batch_size
    }

    /// 实例数据的字节视图
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// 精灵批量收集器
///
/// 一个无图形设备的 [`RenderSurface`]：把四边形按混合模式收集成实例批次，
/// 由宿主一次性上传。同时统计批次开启/结束和绘制调用次数。
#[derive(Debug)]
pub struct QuadBatcher {
    /// 当前批次
    current_batch: Option<SpriteBatch>,
    /// 已完成的批次
    completed_batches: Vec<SpriteBatch>,
    /// 最大批次大小
    max_batch_size: usize,
    begins: usize,
    ends: usize,
    draw_calls: usize,
}

impl QuadBatcher {
    /// 创建新的批量收集器
    pub fn new(max_batch_size: usize) -> Self {
        Self {
            current_batch: None,
            completed_batches: Vec::new(),
            max_batch_size: max_batch_size.max(1),
            begins: 0,
            ends: 0,
            draw_calls: 0,
        }
    }

    /// 获取所有已完成的批次
    pub fn batches(&self) -> impl Iterator<Item = &SpriteBatch> {
        self.completed_batches.iter()
    }

    /// 已完成批次中的实例总数
    pub fn instance_count(&self) -> usize {
        self.completed_batches.iter().map(SpriteBatch::len).sum()
    }

    pub fn begin_count(&self) -> usize {
        self.begins
    }

    pub fn end_count(&self) -> usize {
        self.ends
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// 清空所有批次和计数（保留当前打开批次的混合状态）
    ///
    /// 仍打开的批次计为一次开启，使之后的 `end_batch` 保持计数平衡。
    pub fn clear(&mut self) {
        if let Some(batch) = &mut self.current_batch {
            batch.clear();
        }
        self.completed_batches.clear();
        self.begins = usize::from(self.current_batch.is_some());
        self.ends = 0;
        self.draw_calls = 0;
    }

    fn finish_current(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.is_empty() {
                self.completed_batches.push(batch);
            }
        }
    }
}

impl RenderSurface for QuadBatcher {
    fn active_blend(&self) -> Option<BlendMode> {
        self.current_batch.as_ref().map(SpriteBatch::mode)
    }

    fn begin_batch(&mut self, mode: BlendMode) {
        if self.current_batch.is_some() {
            tracing::warn!(target: "particles.render", "begin_batch while a batch is open; closing it");
            self.finish_current();
        }
        self.current_batch = Some(SpriteBatch::new(mode, self.max_batch_size));
        self.begins += 1;
    }

    fn end_batch(&mut self) {
        if self.current_batch.is_none() {
            tracing::warn!(target: "particles.render", "end_batch without an open batch");
            return;
        }
        self.finish_current();
        self.ends += 1;
    }

    fn draw_quad(&mut self, quad: &ParticleQuad) {
        let Some(batch) = &mut self.current_batch else {
            tracing::warn!(target: "particles.render", "draw_quad outside of a batch ignored");
            return;
        };

        let instance = SpriteInstance::from_quad(quad);
        self.draw_calls += 1;
        if !batch.add(instance) {
            // 当前批次已满,创建同一混合模式的新批次
            let mut new_batch = SpriteBatch::new(batch.mode(), self.max_batch_size);
            new_batch.add(instance);

            let old_batch = std::mem::replace(batch, new_batch);
            self.completed_batches.push(old_batch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Color;
    use crate::resources::TextureHandle;
    use glam::Vec2;

    fn quad(x: f32) -> ParticleQuad {
        ParticleQuad {
            texture: TextureHandle(1),
            center: Vec2::new(x, 0.0),
            rotation: 0.0,
            scale: 1.0,
            tint: Color::WHITE,
        }
    }

    #[test]
    fn test_sprite_batch() {
        let mut batch = SpriteBatch::new(BlendMode::Additive, 10);

        for i in 0..5 {
            assert!(batch.add(SpriteInstance::from_quad(&quad(i as f32))));
        }

        assert_eq!(batch.len(), 5);
        assert!(!batch.is_full());
        assert_eq!(batch.as_bytes().len(), 5 * std::mem::size_of::<SpriteInstance>());
    }

    #[test]
    fn test_batcher_splits_full_batches() {
        let mut batcher = QuadBatcher::new(2);
        batcher.begin_batch(BlendMode::Additive);

        // 添加3个精灵,应该创建2个批次
        for i in 0..3 {
            batcher.draw_quad(&quad(i as f32));
        }
        batcher.end_batch();

        assert_eq!(batcher.batches().count(), 2);
        assert_eq!(batcher.instance_count(), 3);
        assert_eq!(batcher.draw_calls(), 3);
        assert!(batcher.batches().all(|b| b.mode() == BlendMode::Additive));
    }

    #[test]
    fn test_draw_outside_batch_is_ignored() {
        let mut batcher = QuadBatcher::new(4);
        batcher.draw_quad(&quad(0.0));
        batcher.end_batch();
        assert_eq!(batcher.draw_calls(), 0);
        assert_eq!(batcher.end_count(), 0);
    }

    #[test]
    fn test_clear_keeps_open_batch_balanced() {
        let mut batcher = QuadBatcher::new(4);
        batcher.begin_batch(BlendMode::Alpha);
        batcher.draw_quad(&quad(0.0));
        batcher.clear();

        assert_eq!(batcher.begin_count(), 1);
        assert_eq!(batcher.draw_calls(), 0);
        assert_eq!(batcher.active_blend(), Some(BlendMode::Alpha));

        batcher.end_batch();
        assert_eq!(batcher.begin_count(), batcher.end_count());
        assert_eq!(batcher.instance_count(), 0);

        batcher.clear();
        assert_eq!(batcher.begin_count(), 0);
        assert_eq!(batcher.end_count(), 0);
    }

    #[test]
    fn test_instance_transform() {
        let q = ParticleQuad {
            texture: TextureHandle(4),
            center: Vec2::new(3.0, -2.0),
            rotation: std::f32::consts::FRAC_PI_2,
            scale: 2.0,
            tint: Color::RED,
        };
        let instance = SpriteInstance::from_quad(&q);
        assert_eq!(instance.position(), Vec3::new(3.0, -2.0, 0.0));
        assert_eq!(instance.texture, 4);
        assert_eq!(instance.color, [1.0, 0.0, 0.0, 1.0]);

        // 旋转90度后 x 轴映射到 y 轴，长度为缩放值
        let m = Mat4::from_cols_array_2d(&instance.transform);
        let x_axis = m.transform_vector3(Vec3::X);
        assert!((x_axis - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }
}
