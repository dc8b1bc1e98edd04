//! 活动集
//!
//! 容量固定的存活粒子集合，保存槽位索引。移除采用 swap-remove，
//! 因此跨帧的迭代顺序不作保证。

/// 活动集
#[derive(Debug, Clone)]
pub struct ActiveSet {
    indices: Vec<u32>,
    capacity: usize,
}

impl ActiveSet {
    /// 创建指定容量的活动集
    pub fn new(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// 尝试加入；已满时返回 `false`，不驱逐已有粒子
    pub fn try_push(&mut self, index: u32) -> bool {
        if self.is_full() {
            return false;
        }
        self.indices.push(index);
        true
    }

    /// O(1) 移除位置 `position` 的元素，末尾元素被移到该位置
    pub fn swap_remove(&mut self, position: usize) -> u32 {
        self.indices.swap_remove(position)
    }

    /// 位置 `position` 的槽位索引
    pub fn get(&self, position: usize) -> Option<u32> {
        self.indices.get(position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().copied()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.indices.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 清空并返回被移出的槽位索引
    pub fn drain(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.indices.drain(..)
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}
