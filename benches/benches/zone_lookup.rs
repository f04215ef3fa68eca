// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use precinct_scope::{ConfigKey, Location, RegionSystem, ScopeRef};
use precinct_shape::Shape;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_shapes(count: usize, world: f64) -> Vec<Shape> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    (0..count)
        .map(|i| {
            let x = rng.next_f64() * world;
            let z = rng.next_f64() * world;
            let r = 4.0 + rng.next_f64() * 60.0;
            let shape = match i % 4 {
                0 => Shape::cuboid(x, 0.0, z, x + r, 128.0, z + r),
                1 => Shape::cylinder(x, z, 0.0, 128.0, r),
                2 => Shape::sphere(x, 64.0, z, r),
                _ => Shape::slab(100.0 + (i % 7) as f64, 110.0 + (i % 7) as f64),
            };
            shape.expect("generated shapes are valid")
        })
        .collect()
}

/// A system where every zone has its own priority, so nothing conflicts.
fn populate(shapes: &[Shape], key: &ConfigKey<u32>) -> RegionSystem<u32> {
    let system = RegionSystem::new();
    for (i, shape) in shapes.iter().enumerate() {
        let name = format!("zone{i}");
        system
            .add_zone(name.as_str(), "overworld", *shape, i as i32)
            .expect("unique priorities never conflict");
        system
            .assign(&ScopeRef::zone(name.as_str()), key, i as u32)
            .expect("zone exists");
    }
    system
}

fn bench_intersects(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_intersects");
    let shapes = gen_shapes(256, 1024.0);
    group.throughput(Throughput::Elements((shapes.len() * shapes.len()) as u64));
    group.bench_function("all_pairs_256", |b| {
        b.iter(|| {
            let mut n = 0usize;
            for a in &shapes {
                for s in &shapes {
                    n += usize::from(a.intersects(s));
                }
            }
            black_box(n)
        })
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let key = ConfigKey::new("level", 0_u32);
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let spread: Vec<Location> = (0..1024)
        .map(|_| {
            Location::new(
                "overworld",
                rng.next_f64() * 2048.0,
                rng.next_f64() * 128.0,
                rng.next_f64() * 2048.0,
            )
        })
        .collect();
    let walk: Vec<Location> = (0..1024)
        .map(|i| Location::new("overworld", 500.0 + (i % 8) as f64, 64.0, 500.0 + (i / 128) as f64))
        .collect();

    for &n in &[32usize, 256, 1024] {
        let system = populate(&gen_shapes(n, 2048.0), &key);
        group.throughput(Throughput::Elements(spread.len() as u64));
        group.bench_function(format!("spread_n{}", n), |b| {
            b.iter(|| {
                let mut acc = 0u32;
                for loc in &spread {
                    acc = acc.wrapping_add(system.lookup(&key, loc));
                }
                black_box(acc)
            })
        });
        group.bench_function(format!("walk_n{}", n), |b| {
            b.iter(|| {
                let mut acc = 0u32;
                for loc in &walk {
                    acc = acc.wrapping_add(system.lookup(&key, loc));
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_intersects, bench_lookup);
criterion_main!(benches);
