//! ECS 集成
//!
//! `ParticleSystem` 作为 `Resource` 放入 `World`。游戏逻辑系统把生成请求写入
//! [`ParticleSpawnQueue`]，每帧先处理请求再推进生命周期。绘制依赖宿主渲染表面，
//! 由宿主在渲染阶段直接调用 [`ParticleSystem::draw`]。

use crate::config::ParticleConfig;
use crate::core::error::EffectsResult;
use crate::particles::{Admission, ParticleDesc, ParticleSystem};
use bevy_ecs::prelude::*;

/// 待生成粒子队列
#[derive(Resource, Default, Debug)]
pub struct ParticleSpawnQueue {
    requests: Vec<ParticleDesc>,
}

impl ParticleSpawnQueue {
    pub fn push(&mut self, desc: ParticleDesc) {
        self.requests.push(desc);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// 处理生成请求
pub fn particle_spawn_system(
    mut queue: ResMut<ParticleSpawnQueue>,
    mut particles: ResMut<ParticleSystem>,
) {
    if queue.requests.is_empty() {
        return;
    }

    let mut dropped = 0;
    for desc in queue.requests.drain(..) {
        if particles.spawn(&desc) == Admission::Dropped {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(target: "particles", "Dropped {} queued particles at capacity", dropped);
    }
}

/// 推进粒子生命周期
pub fn particle_tick_system(mut particles: ResMut<ParticleSystem>) {
    particles.tick();
}

/// 注册粒子系统（先生成后推进）
pub fn add_particle_systems(schedule: &mut Schedule) {
    schedule.add_systems((particle_spawn_system, particle_tick_system).chain());
}

/// 向 `World` 插入粒子相关资源
pub fn insert_particle_resources(world: &mut World, config: &ParticleConfig) -> EffectsResult<()> {
    world.insert_resource(ParticleSystem::from_config(config)?);
    world.insert_resource(ParticleSpawnQueue::default());
    Ok(())
}
