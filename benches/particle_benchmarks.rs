//! 粒子系统性能基准测试
//!
//! 测试满载活动集的 tick、绘制以及获取/提交的开销

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use glam::{UVec2, Vec2};
use particle_fx::particles::{Color, ParticleDesc, ParticleSystem};
use particle_fx::render::QuadBatcher;
use particle_fx::resources::TextureTable;

fn filled_system(count: usize, texture: particle_fx::TextureHandle) -> ParticleSystem {
    let mut system = ParticleSystem::new(count);
    for i in 0..count {
        system.spawn(
            &ParticleDesc::new(texture)
                .at(Vec2::new(i as f32, 0.0))
                .velocity(Vec2::new(0.5, -1.0))
                .gravity(0.1)
                .drag(0.98)
                .color(Color::RED)
                .gradient(Color::BLUE)
                .lifetime(i32::MAX)
                .fade_out(true)
                .shrink(true),
        );
    }
    system
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_tick");
    let mut textures = TextureTable::new();
    let spark = textures.register("spark");

    for count in [100, 1200, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let mut system = filled_system(count, spark);
            b.iter(|| {
                system.tick();
                black_box(system.live_count())
            });
        });
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_draw");
    let mut textures = TextureTable::new();
    let spark = textures.register("spark");
    textures
        .mark_loaded(spark, UVec2::new(16, 16))
        .expect("texture registered");

    for count in [100, 1200, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let system = filled_system(count, spark);
            let mut surface = QuadBatcher::new(1024);
            b.iter(|| {
                surface.clear();
                black_box(system.draw(&mut surface, &textures, Vec2::ZERO))
            });
        });
    }

    group.finish();
}

fn bench_spawn_cycle(c: &mut Criterion) {
    let mut textures = TextureTable::new();
    let spark = textures.register("spark");

    c.bench_function("spawn_cycle_steady_state", |b| {
        let mut system = ParticleSystem::new(1200);
        system.prewarm(1200);
        b.iter(|| {
            for _ in 0..40 {
                system.spawn(&ParticleDesc::new(spark).lifetime(30));
            }
            system.tick();
            black_box(system.stats().pool.allocations)
        });
    });
}

criterion_group!(benches, bench_tick, bench_draw, bench_spawn_cycle);
criterion_main!(benches);
