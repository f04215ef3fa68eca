// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use precinct_index::{Aabb3D, CacheConfig, CachedIndex, PartitionTree, TreeConfig};

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

/// Zone-like boxes: wide horizontally, spanning most of the build height.
fn gen_zones(count: usize, world: f64, max_size: f64) -> Vec<(u32, Aabb3D<f64>)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|i| {
            let w = 8.0 + rng.next_f64() * max_size;
            let d = 8.0 + rng.next_f64() * max_size;
            let x = rng.next_f64() * (world - w);
            let z = rng.next_f64() * (world - d);
            let y = rng.next_f64() * 64.0;
            (i as u32, Aabb3D::from_origin_size(x, y, z, w, 128.0, d))
        })
        .collect()
}

/// Many zones nested around one point, the worst case for dividers.
fn gen_nested(count: usize) -> Vec<(u32, Aabb3D<f64>)> {
    (0..count)
        .map(|i| {
            let r = 4.0 + i as f64 * 2.0;
            (i as u32, Aabb3D::new(-r, 0.0, -r, r, 256.0, r))
        })
        .collect()
}

fn gen_points(count: usize, world: f64) -> Vec<(f64, f64, f64)> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| {
            (
                rng.next_f64() * world,
                rng.next_f64() * 192.0,
                rng.next_f64() * world,
            )
        })
        .collect()
}

fn linear_scan(items: &[(u32, Aabb3D<f64>)], x: f64, y: f64, z: f64) -> usize {
    items
        .iter()
        .filter(|(_, r)| r.contains_point(x, y, z))
        .count()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[64usize, 512, 4096] {
        let zones = gen_zones(n, 4096.0, 256.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("bulk_n{}", n), |b| {
            b.iter_batched(
                || zones.clone(),
                |zones| {
                    let tree = PartitionTree::bulk(TreeConfig::default(), zones);
                    black_box(tree.stats());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let nested = gen_nested(256);
    group.bench_function("bulk_nested_256", |b| {
        b.iter_batched(
            || nested.clone(),
            |zones| black_box(PartitionTree::bulk(TreeConfig::default(), zones).len()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_point");
    let points = gen_points(1024, 4096.0);
    for &n in &[64usize, 512, 4096] {
        let zones = gen_zones(n, 4096.0, 256.0);
        let tree = PartitionTree::bulk(TreeConfig::default(), zones.clone());
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("tree_n{}", n), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for &(x, y, z) in &points {
                    hits += tree.query_point(x, y, z).count();
                }
                black_box(hits)
            })
        });
        group.bench_function(format!("linear_n{}", n), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for &(x, y, z) in &points {
                    hits += linear_scan(&zones, x, y, z);
                }
                black_box(hits)
            })
        });
    }
    group.finish();
}

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_cell");
    let zones = gen_zones(1024, 4096.0, 256.0);
    // A player walking around: few distinct cells, many repeats.
    let cells: Vec<(i64, i64, i64)> = (0..4096)
        .map(|i: i64| (1000 + (i / 16) % 32, 64, 1000 + i % 16))
        .collect();
    group.throughput(Throughput::Elements(cells.len() as u64));

    let tree = PartitionTree::bulk(TreeConfig::default(), zones.clone());
    group.bench_function("uncached", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &cell in &cells {
                hits += tree.query_cell(cell).len();
            }
            black_box(hits)
        })
    });

    group.bench_function("cached", |b| {
        b.iter_batched(
            || CachedIndex::with_tree(tree.clone(), CacheConfig::default()),
            |mut idx| {
                let mut hits = 0usize;
                for &(x, y, z) in &cells {
                    hits += idx.query(x, y, z).len();
                }
                black_box(hits)
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query, bench_cache);
criterion_main!(benches);
