//! 回收池
//!
//! 粒子记录存放在按索引寻址的槽位数组中，空闲槽位组成 free-list。
//! 槽位只增不减：池为空时才分配新槽位，稳定负载下分配计数停止增长。
//!
//! 每个槽位带代数（generation）。槽位归还时代数递增，
//! 因此回收后仍被调用方持有的旧句柄会被识别为过期句柄。

use super::record::ParticleRecord;
use crate::core::error::{ParticleError, ParticleResult};

/// 粒子句柄
///
/// 由槽位索引和代数组成；只有代数与槽位当前代数一致时才有效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    index: u32,
    generation: u32,
}

impl ParticleHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// 有效句柄所指记录的当前所有者
///
/// 回收池中的记录没有有效句柄：归还时代数递增，旧句柄随之过期，
/// 因此 [`RecyclingPool::owner`] 对回收池中的槽位返回 `None`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// 已获取但尚未提交，由调用方持有
    Caller,
    /// 已提交，位于活动集
    ActiveSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    Pending,
    Live,
}

impl SlotState {
    fn name(self) -> &'static str {
        match self {
            SlotState::Idle => "idle",
            SlotState::Pending => "pending",
            SlotState::Live => "live",
        }
    }
}

#[derive(Debug)]
struct Slot {
    record: ParticleRecord,
    generation: u32,
    state: SlotState,
}

/// 对象池统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// 新分配的槽位总数
    pub allocations: usize,
    /// 复用空闲槽位的次数
    pub reuses: usize,
    /// 归还次数
    pub releases: usize,
    /// 当前空闲槽位数
    pub idle: usize,
}

impl PoolStats {
    /// 计算复用命中率
    pub fn hit_rate(&self) -> f32 {
        let acquisitions = self.allocations + self.reuses;
        if acquisitions == 0 {
            0.0
        } else {
            self.reuses as f32 / acquisitions as f32
        }
    }
}

/// 粒子回收池
#[derive(Debug, Default)]
pub struct RecyclingPool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// 新槽位的起始代数；`clear` 时抬高，使清空前的句柄永不再生效
    generation_floor: u32,
    allocations: usize,
    reuses: usize,
    releases: usize,
}

impl RecyclingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取一条记录（重置为默认值），池空时分配新槽位
    pub fn acquire(&mut self) -> ParticleHandle {
        let index = match self.free.pop() {
            Some(index) => {
                self.reuses += 1;
                index
            }
            None => self.allocate_slot(),
        };

        let slot = &mut self.slots[index as usize];
        slot.record.reset();
        slot.state = SlotState::Pending;
        ParticleHandle {
            index,
            generation: slot.generation,
        }
    }

    /// 预分配空闲槽位，使空闲数至少为 `count`
    pub fn prewarm(&mut self, count: usize) {
        while self.free.len() < count {
            let index = self.allocate_slot();
            self.free.push(index);
        }
    }

    fn allocate_slot(&mut self) -> u32 {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            record: ParticleRecord::default(),
            generation: self.generation_floor,
            state: SlotState::Idle,
        });
        self.allocations += 1;
        index
    }

    /// 归还调用方持有的记录
    ///
    /// 只接受尚未提交的句柄；活动集中的记录由 `tick` 负责归还。
    pub fn release(&mut self, handle: ParticleHandle) -> ParticleResult<()> {
        self.expect_state(handle, SlotState::Pending)?;
        self.recycle(handle.index);
        Ok(())
    }

    /// 把槽位放回 free-list 并递增代数
    pub(crate) fn recycle(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        debug_assert_ne!(slot.state, SlotState::Idle, "slot {} released twice", index);
        slot.state = SlotState::Idle;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.releases += 1;
    }

    /// 标记为已提交，返回槽位索引
    pub(crate) fn mark_live(&mut self, handle: ParticleHandle) -> ParticleResult<u32> {
        self.expect_state(handle, SlotState::Pending)?;
        self.slots[handle.index as usize].state = SlotState::Live;
        Ok(handle.index)
    }

    /// 获取可写记录（仅限尚未提交的句柄）
    pub(crate) fn pending_mut(&mut self, handle: ParticleHandle) -> ParticleResult<&mut ParticleRecord> {
        self.expect_state(handle, SlotState::Pending)?;
        Ok(&mut self.slots[handle.index as usize].record)
    }

    pub(crate) fn record(&self, index: u32) -> &ParticleRecord {
        &self.slots[index as usize].record
    }

    pub(crate) fn record_mut(&mut self, index: u32) -> &mut ParticleRecord {
        &mut self.slots[index as usize].record
    }

    /// 由槽位索引构造当前代数的句柄
    pub(crate) fn handle_at(&self, index: u32) -> ParticleHandle {
        ParticleHandle {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// 读取记录（不可用于已回收的句柄）
    pub fn get(&self, handle: ParticleHandle) -> ParticleResult<&ParticleRecord> {
        let slot = self.slot(handle)?;
        if slot.state == SlotState::Idle {
            return Err(ParticleError::StaleHandle {
                index: handle.index,
                generation: handle.generation,
            });
        }
        Ok(&slot.record)
    }

    /// 查询句柄当前所有者；过期句柄（包括已归还回收池的记录）返回 `None`
    pub fn owner(&self, handle: ParticleHandle) -> Option<Owner> {
        match self.slot(handle).ok()?.state {
            SlotState::Idle => None,
            SlotState::Pending => Some(Owner::Caller),
            SlotState::Live => Some(Owner::ActiveSet),
        }
    }

    /// 槽位索引是否在 free-list 中
    pub fn is_idle(&self, index: u32) -> bool {
        self.slots
            .get(index as usize)
            .map(|slot| slot.state == SlotState::Idle)
            .unwrap_or(false)
    }

    fn slot(&self, handle: ParticleHandle) -> ParticleResult<&Slot> {
        let slot = self
            .slots
            .get(handle.index as usize)
            .ok_or(ParticleError::OutOfRange {
                index: handle.index,
            })?;
        if slot.generation != handle.generation {
            return Err(ParticleError::StaleHandle {
                index: handle.index,
                generation: handle.generation,
            });
        }
        Ok(slot)
    }

    fn expect_state(&self, handle: ParticleHandle, expected: SlotState) -> ParticleResult<()> {
        let slot = self.slot(handle)?;
        if slot.state != expected {
            return Err(ParticleError::InvalidState {
                index: handle.index,
                expected: expected.name(),
                found: slot.state.name(),
            });
        }
        Ok(())
    }

    /// 空闲槽位数
    pub fn idle_count(&self) -> usize {
        self.free.len()
    }

    /// 已分配槽位总数（只增不减，`clear` 除外）
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// 处于“已获取未提交”状态的槽位数
    pub fn pending_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.state == SlotState::Pending)
            .count()
    }

    /// 获取池统计信息
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocations: self.allocations,
            reuses: self.reuses,
            releases: self.releases,
            idle: self.free.len(),
        }
    }

    /// 清空池，释放所有槽位
    ///
    /// 清空后新槽位的代数从所有旧代数之上开始，旧句柄全部失效。
    pub fn clear(&mut self) {
        let max_generation = self
            .slots
            .iter()
            .map(|slot| slot.generation)
            .max()
            .unwrap_or(self.generation_floor);
        self.generation_floor = max_generation.max(self.generation_floor).wrapping_add(1);
        self.slots.clear();
        self.free.clear();
    }
}
