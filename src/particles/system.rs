//! 粒子系统上下文
//!
//! [`ParticleSystem`] 把回收池、活动集和生命周期调度组合成一个显式的上下文对象，
//! 每个会话构造一次，按引用传入帧循环。多个实例互不影响。
//!
//! 帧循环接口（`acquire` / `configure` / `submit` / `tick` / `draw`）从不返回错误：
//! 容量耗尽时静默丢弃，过期句柄记录告警后忽略。需要观察失败原因时使用 `try_*` 接口。

use super::active::ActiveSet;
use super::desc::ParticleDesc;
use super::pool::{Owner, ParticleHandle, PoolStats, RecyclingPool};
use super::record::ParticleRecord;
use crate::config::ParticleConfig;
use crate::core::error::{EffectsResult, ParticleResult};
use crate::render::particle_renderer::{DrawStats, ParticleRenderer};
use crate::render::surface::RenderSurface;
use crate::resources::TextureSource;
use bevy_ecs::prelude::Resource;
use glam::Vec2;

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// 已加入活动集
    Admitted,
    /// 活动集已满，记录被丢弃并归还回收池
    Dropped,
    /// 句柄无效，未做任何事
    Rejected,
}

/// 粒子系统统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    /// 存活粒子数
    pub live: usize,
    /// 活动集容量
    pub capacity: usize,
    /// 已获取但尚未提交的记录数
    pub pending: usize,
    /// 回收池统计
    pub pool: PoolStats,
    /// 成功提交的总数
    pub submitted: u64,
    /// 因容量耗尽而丢弃的总数
    pub dropped: u64,
    /// 已执行的 tick 数
    pub ticks: u64,
}

/// 粒子系统
#[derive(Debug, Resource)]
pub struct ParticleSystem {
    pool: RecyclingPool,
    active: ActiveSet,
    submitted: u64,
    dropped: u64,
    ticks: u64,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CAPACITY)
    }
}

impl ParticleSystem {
    /// 创建指定活动集容量的粒子系统
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: RecyclingPool::new(),
            active: ActiveSet::new(capacity),
            submitted: 0,
            dropped: 0,
            ticks: 0,
        }
    }

    /// 从配置创建（先验证配置）
    pub fn from_config(config: &ParticleConfig) -> EffectsResult<Self> {
        config.validate()?;
        let mut system = Self::new(config.capacity);
        system.prewarm(config.prewarm);
        tracing::info!(
            target: "particles",
            "Particle system created: capacity={}, prewarm={}",
            config.capacity,
            config.prewarm
        );
        Ok(system)
    }

    /// 预分配空闲记录
    pub fn prewarm(&mut self, count: usize) {
        self.pool.prewarm(count);
    }

    /// 获取一条已重置的记录
    pub fn acquire(&mut self) -> ParticleHandle {
        self.pool.acquire()
    }

    /// 用描述配置已获取的记录，返回同一句柄以便链式提交
    ///
    /// 句柄无效（已过期或已提交）时记录告警并忽略。
    pub fn configure(&mut self, handle: ParticleHandle, desc: &ParticleDesc) -> ParticleHandle {
        if let Err(err) = self.try_configure(handle, desc) {
            tracing::warn!(target: "particles", "configure ignored: {}", err);
        }
        handle
    }

    pub fn try_configure(&mut self, handle: ParticleHandle, desc: &ParticleDesc) -> ParticleResult<()> {
        let record = self.pool.pending_mut(handle)?;
        desc.apply(record);
        Ok(())
    }

    /// 直接修改尚未提交的记录
    pub fn record_mut(&mut self, handle: ParticleHandle) -> ParticleResult<&mut ParticleRecord> {
        self.pool.pending_mut(handle)
    }

    /// 提交到活动集
    ///
    /// 活动集已满时静默丢弃新记录（不驱逐已有粒子），记录归还回收池。
    pub fn submit(&mut self, handle: ParticleHandle) -> Admission {
        match self.try_submit(handle) {
            Ok(admission) => admission,
            Err(err) => {
                tracing::warn!(target: "particles", "submit ignored: {}", err);
                Admission::Rejected
            }
        }
    }

    pub fn try_submit(&mut self, handle: ParticleHandle) -> ParticleResult<Admission> {
        if self.active.is_full() {
            // 先验证句柄，避免把无效句柄计为丢弃
            self.pool.release(handle)?;
            self.dropped += 1;
            tracing::trace!(
                target: "particles",
                "Active set full ({}), dropped particle",
                self.active.capacity()
            );
            return Ok(Admission::Dropped);
        }

        let index = self.pool.mark_live(handle)?;
        let admitted = self.active.try_push(index);
        debug_assert!(admitted);
        self.submitted += 1;
        Ok(Admission::Admitted)
    }

    /// 获取、配置并提交
    pub fn spawn(&mut self, desc: &ParticleDesc) -> Admission {
        let handle = self.acquire();
        self.configure(handle, desc);
        self.submit(handle)
    }

    /// 放弃一条已获取但不打算提交的记录
    pub fn release(&mut self, handle: ParticleHandle) {
        if let Err(err) = self.try_release(handle) {
            tracing::warn!(target: "particles", "release ignored: {}", err);
        }
    }

    pub fn try_release(&mut self, handle: ParticleHandle) -> ParticleResult<()> {
        self.pool.release(handle)
    }

    /// 推进一帧
    ///
    /// 从活动集末尾向前遍历，swap-remove 不会跳过未访问的元素。
    pub fn tick(&mut self) {
        self.ticks += 1;

        let mut position = self.active.len();
        while position > 0 {
            position -= 1;
            let Some(index) = self.active.get(position) else {
                continue;
            };

            if self.pool.record_mut(index).advance() {
                self.active.swap_remove(position);
                self.pool.recycle(index);
            }
        }
    }

    /// 绘制所有存活粒子
    pub fn draw<S, T>(&self, surface: &mut S, textures: &T, camera_offset: Vec2) -> DrawStats
    where
        S: RenderSurface + ?Sized,
        T: TextureSource + ?Sized,
    {
        ParticleRenderer::draw(&self.pool, &self.active, surface, textures, camera_offset)
    }

    /// 整体拆除：清空活动集和回收池
    ///
    /// 之后系统可继续使用；拆除前发出的句柄全部失效。
    pub fn teardown(&mut self) {
        let live = self.active.len();
        self.active.clear();
        self.pool.clear();
        tracing::debug!(target: "particles", "Particle system torn down ({} live particles discarded)", live);
    }

    /// 读取记录（已获取或存活）
    pub fn get(&self, handle: ParticleHandle) -> ParticleResult<&ParticleRecord> {
        self.pool.get(handle)
    }

    /// 查询句柄所有者；过期或已回收的句柄返回 `None`
    pub fn owner(&self, handle: ParticleHandle) -> Option<Owner> {
        self.pool.owner(handle)
    }

    /// 句柄是否仍在活动集中
    pub fn is_live(&self, handle: ParticleHandle) -> bool {
        self.owner(handle) == Some(Owner::ActiveSet)
    }

    /// 遍历存活粒子（顺序不保证）
    pub fn iter_live(&self) -> impl Iterator<Item = (ParticleHandle, &ParticleRecord)> + '_ {
        self.active
            .iter()
            .map(move |index| (self.pool.handle_at(index), self.pool.record(index)))
    }

    pub fn live_count(&self) -> usize {
        self.active.len()
    }

    pub fn capacity(&self) -> usize {
        self.active.capacity()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    pub fn pool(&self) -> &RecyclingPool {
        &self.pool
    }

    pub fn active_set(&self) -> &ActiveSet {
        &self.active
    }

    /// 获取统计信息
    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            live: self.active.len(),
            capacity: self.active.capacity(),
            pending: self.pool.pending_count(),
            pool: self.pool.stats(),
            submitted: self.submitted,
            dropped: self.dropped,
            ticks: self.ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ParticleError;
    use crate::particles::Color;
    use crate::resources::TextureHandle;
    use proptest::prelude::*;

    fn desc(lifetime: i32) -> ParticleDesc {
        ParticleDesc::new(TextureHandle(0)).lifetime(lifetime)
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut system = ParticleSystem::new(16);

        let handle = system.acquire();
        let handle = system.configure(
            handle,
            &ParticleDesc::new(TextureHandle(0))
                .at(Vec2::ZERO)
                .velocity(Vec2::new(1.0, 0.0))
                .color(Color::WHITE)
                .scale(1.0)
                .lifetime(2),
        );
        assert_eq!(system.submit(handle), Admission::Admitted);

        system.tick();
        let record = system.get(handle).unwrap();
        assert_eq!(record.position, Vec2::new(1.0, 0.0));
        assert_eq!(record.remaining_lifetime(), 1);
        assert!(system.is_live(handle));

        system.tick();
        assert_eq!(system.live_count(), 0);
        assert!(!system.is_live(handle));
        assert!(system.get(handle).is_err());

        // 同一槽位被复用，并已重置为默认值
        let reused = system.acquire();
        assert_eq!(reused.index(), handle.index());
        assert_ne!(reused, handle);
        assert_eq!(*system.get(reused).unwrap(), ParticleRecord::default());
    }

    #[test]
    fn test_capacity_invariant() {
        let capacity = 10;
        let extra = 7;
        let mut system = ParticleSystem::new(capacity);

        let admissions: Vec<Admission> = (0..capacity + extra)
            .map(|_| system.spawn(&desc(30)))
            .collect();

        assert_eq!(system.live_count(), capacity);
        assert_eq!(system.dropped_count(), extra as u64);
        assert_eq!(
            admissions.iter().filter(|a| **a == Admission::Dropped).count(),
            extra
        );
        // 丢弃的记录已归还回收池
        assert_eq!(system.stats().pending, 0);
        assert_eq!(system.pool().idle_count(), 1);
    }

    #[test]
    fn test_lifetime_monotonicity() {
        for lifetime in 1..20 {
            let mut system = ParticleSystem::new(4);
            let handle = system.acquire();
            system.configure(handle, &desc(lifetime));
            system.submit(handle);

            for _ in 1..lifetime {
                system.tick();
                assert!(system.is_live(handle));
            }
            system.tick();
            assert!(!system.is_live(handle));
        }
    }

    #[test]
    fn test_invalid_lifetime_recycled_next_tick() {
        let mut system = ParticleSystem::new(4);
        assert_eq!(system.spawn(&desc(0)), Admission::Admitted);
        assert_eq!(system.spawn(&desc(-3)), Admission::Admitted);
        assert_eq!(system.live_count(), 2);

        system.tick();
        assert_eq!(system.live_count(), 0);
        assert_eq!(system.pool().idle_count(), 2);
    }

    #[test]
    fn test_pool_reuse_bounded_allocations() {
        let mut system = ParticleSystem::new(64);

        // 每帧生成 4 个寿命 5 帧的粒子，稳态下存活约 20 个
        for _ in 0..200 {
            for _ in 0..4 {
                system.spawn(&desc(5));
            }
            system.tick();
        }
        let allocated = system.pool().allocated();

        for _ in 0..500 {
            for _ in 0..4 {
                system.spawn(&desc(5));
            }
            system.tick();
        }

        assert_eq!(system.pool().allocated(), allocated);
        assert!(allocated <= 24);
        assert!(system.stats().pool.hit_rate() > 0.9);
    }

    #[test]
    fn test_stale_handles_are_ignored() {
        let mut system = ParticleSystem::new(4);
        let handle = system.acquire();
        system.release(handle);

        let fresh = system.acquire();
        system.configure(handle, &desc(10).scale(5.0));
        assert_eq!(system.get(fresh).unwrap().scale, 1.0);

        assert_eq!(system.submit(handle), Admission::Rejected);
        assert!(matches!(
            system.try_submit(handle),
            Err(ParticleError::StaleHandle { .. })
        ));
        assert_eq!(system.owner(handle), None);
        assert_eq!(system.owner(fresh), Some(Owner::Caller));
    }

    #[test]
    fn test_submitted_records_are_immutable_to_callers() {
        let mut system = ParticleSystem::new(4);
        let handle = system.acquire();
        system.configure(handle, &desc(10));
        system.submit(handle);

        assert!(matches!(
            system.try_configure(handle, &desc(3)),
            Err(ParticleError::InvalidState { .. })
        ));
        assert!(system.record_mut(handle).is_err());
        assert_eq!(system.submit(handle), Admission::Rejected);
        assert_eq!(system.live_count(), 1);
    }

    #[test]
    fn test_teardown_is_restartable() {
        let mut system = ParticleSystem::new(4);
        let handle = system.acquire();
        system.configure(handle, &desc(10));
        system.submit(handle);
        system.spawn(&desc(10));

        system.teardown();
        assert_eq!(system.live_count(), 0);
        assert_eq!(system.pool().allocated(), 0);
        assert_eq!(system.owner(handle), None);

        assert_eq!(system.spawn(&desc(2)), Admission::Admitted);
        system.tick();
        system.tick();
        assert_eq!(system.live_count(), 0);
    }

    #[test]
    fn test_from_config() {
        let config = ParticleConfig {
            capacity: 32,
            prewarm: 8,
            max_batch_size: 64,
        };
        let system = ParticleSystem::from_config(&config).unwrap();
        assert_eq!(system.capacity(), 32);
        assert_eq!(system.pool().idle_count(), 8);

        assert!(ParticleSystem::from_config(&ParticleConfig::with_capacity(0)).is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire,
        Submit(usize),
        Release(usize),
        Tick,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Acquire),
            3 => (0usize..64).prop_map(Op::Submit),
            1 => (0usize..64).prop_map(Op::Release),
            2 => Just(Op::Tick),
        ]
    }

    // 随机交错操作下的所有权互斥性
    proptest! {
        #[test]
        fn ownership_is_exclusive(
            ops in prop::collection::vec(op_strategy(), 1..200),
            lifetimes in prop::collection::vec(-2i32..8, 64)
        ) {
            let mut system = ParticleSystem::new(8);
            let mut handles: Vec<ParticleHandle> = Vec::new();

            for op in ops {
                match op {
                    Op::Acquire => {
                        let handle = system.acquire();
                        let lifetime = lifetimes[handles.len() % lifetimes.len()];
                        system.configure(handle, &desc(lifetime));
                        handles.push(handle);
                    }
                    Op::Submit(i) if !handles.is_empty() => {
                        system.submit(handles[i % handles.len()]);
                    }
                    Op::Release(i) if !handles.is_empty() => {
                        system.release(handles[i % handles.len()]);
                    }
                    Op::Tick => system.tick(),
                    _ => {}
                }

                let pool = system.pool();
                let active = system.active_set();
                prop_assert!(active.len() <= active.capacity());

                // 活动集中的槽位不在回收池中，且不重复
                let mut seen = std::collections::HashSet::new();
                for index in active.iter() {
                    prop_assert!(!pool.is_idle(index));
                    prop_assert!(seen.insert(index));
                }

                // 每个槽位恰好处于一种状态
                let pending = pool.pending_count();
                prop_assert_eq!(pool.idle_count() + active.len() + pending, pool.allocated());

                for handle in &handles {
                    match system.owner(*handle) {
                        Some(Owner::ActiveSet) => prop_assert!(active.contains(handle.index())),
                        Some(Owner::Caller) => prop_assert!(!active.contains(handle.index())),
                        None => {}
                    }
                }
            }
        }
    }
}
