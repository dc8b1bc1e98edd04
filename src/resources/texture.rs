//! 纹理句柄与纹理表

use crate::core::error::{AssetError, AssetResult};
use glam::UVec2;
use std::collections::HashMap;

/// 不透明纹理句柄
///
/// 由外部资源子系统按名称分配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// 句柄的原始索引
    pub fn index(self) -> u32 {
        self.0
    }
}

/// 纹理加载状态
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded { size: UVec2 },
    Failed(String),
}

/// 纹理状态查询接口
///
/// 渲染器通过该接口判断某个粒子的纹理是否可绘制。
pub trait TextureSource {
    /// 纹理是否已加载完成
    fn is_loaded(&self, texture: TextureHandle) -> bool;

    /// 是否至少有一个纹理加载完成
    fn any_loaded(&self) -> bool;
}

#[derive(Debug, Clone)]
struct TextureEntry {
    name: String,
    state: LoadState,
}

/// 内存纹理表
///
/// 以名称为键登记纹理，并跟踪每个纹理的加载状态。
#[derive(Debug, Default, Clone)]
pub struct TextureTable {
    entries: Vec<TextureEntry>,
    by_name: HashMap<String, TextureHandle>,
    loaded: usize,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记纹理名称，返回其句柄（状态为 `Loading`）
    ///
    /// 同名重复登记返回已有句柄。
    pub fn register(&mut self, name: &str) -> TextureHandle {
        if let Some(handle) = self.by_name.get(name) {
            return *handle;
        }

        let handle = TextureHandle(self.entries.len() as u32);
        self.entries.push(TextureEntry {
            name: name.to_string(),
            state: LoadState::Loading,
        });
        self.by_name.insert(name.to_string(), handle);
        tracing::debug!(target: "resources", "Registered texture {} as {:?}", name, handle);
        handle
    }

    /// 标记纹理加载完成
    pub fn mark_loaded(&mut self, handle: TextureHandle, size: UVec2) -> AssetResult<()> {
        let entry = self
            .entries
            .get_mut(handle.0 as usize)
            .ok_or(AssetError::UnknownHandle(handle.0))?;

        if !matches!(entry.state, LoadState::Loaded { .. }) {
            self.loaded += 1;
        }
        entry.state = LoadState::Loaded { size };
        Ok(())
    }

    /// 标记纹理加载失败
    ///
    /// 失败的纹理不会导致错误传播；使用它的粒子在绘制时被跳过。
    pub fn mark_failed(&mut self, handle: TextureHandle, reason: &str) -> AssetResult<()> {
        let entry = self
            .entries
            .get_mut(handle.0 as usize)
            .ok_or(AssetError::UnknownHandle(handle.0))?;

        if matches!(entry.state, LoadState::Loaded { .. }) {
            self.loaded -= 1;
        }
        tracing::warn!(target: "resources", "Texture {} failed to load: {}", entry.name, reason);
        entry.state = LoadState::Failed(reason.to_string());
        Ok(())
    }

    /// 按名称查找句柄
    pub fn handle(&self, name: &str) -> AssetResult<TextureHandle> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::NotFound {
                name: name.to_string(),
            })
    }

    /// 查询加载状态
    pub fn state(&self, handle: TextureHandle) -> Option<&LoadState> {
        self.entries.get(handle.0 as usize).map(|e| &e.state)
    }

    /// 查询已加载纹理的尺寸
    pub fn size(&self, handle: TextureHandle) -> AssetResult<UVec2> {
        let entry = self
            .entries
            .get(handle.0 as usize)
            .ok_or(AssetError::UnknownHandle(handle.0))?;
        match &entry.state {
            LoadState::Loaded { size } => Ok(*size),
            LoadState::Failed(reason) => Err(AssetError::LoadFailed {
                name: entry.name.clone(),
                reason: reason.clone(),
            }),
            LoadState::Loading => Err(AssetError::NotFound {
                name: entry.name.clone(),
            }),
        }
    }

    /// 已加载纹理数量
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// 登记的纹理总数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextureSource for TextureTable {
    fn is_loaded(&self, texture: TextureHandle) -> bool {
        matches!(self.state(texture), Some(LoadState::Loaded { .. }))
    }

    fn any_loaded(&self) -> bool {
        self.loaded > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut table = TextureTable::new();
        let a = table.register("spark");
        let b = table.register("spark");
        let c = table.register("smoke");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_state_transitions() {
        let mut table = TextureTable::new();
        let spark = table.register("spark");
        assert!(!table.is_loaded(spark));
        assert!(!table.any_loaded());

        table.mark_loaded(spark, UVec2::new(16, 16)).unwrap();
        assert!(table.is_loaded(spark));
        assert_eq!(table.loaded_count(), 1);
        assert_eq!(table.size(spark).unwrap(), UVec2::new(16, 16));

        // 重复标记不重复计数
        table.mark_loaded(spark, UVec2::new(32, 32)).unwrap();
        assert_eq!(table.loaded_count(), 1);

        table.mark_failed(spark, "corrupt").unwrap();
        assert!(!table.is_loaded(spark));
        assert!(!table.any_loaded());
        assert!(matches!(table.size(spark), Err(AssetError::LoadFailed { .. })));
    }

    #[test]
    fn test_unknown_handles() {
        let mut table = TextureTable::new();
        assert_eq!(
            table.mark_loaded(TextureHandle(9), UVec2::ONE),
            Err(AssetError::UnknownHandle(9))
        );
        assert!(!table.is_loaded(TextureHandle(9)));
        assert!(matches!(
            table.handle("missing"),
            Err(AssetError::NotFound { .. })
        ));
    }
}
