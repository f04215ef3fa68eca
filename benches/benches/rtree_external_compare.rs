// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use precinct_index::{Aabb3D, PartitionTree, TreeConfig};

use rstar::RTree;
use rstar::primitives::Rectangle;

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<(u32, Aabb3D<f64>)> {
    let mut out = Vec::with_capacity(n * n);
    for z in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let z0 = z as f64 * cell;
            // Neighbors overlap by half a cell.
            let b = Aabb3D::from_origin_size(x0, 0.0, z0, cell * 1.5, 64.0, cell * 1.5);
            out.push(((z * n + x) as u32, b));
        }
    }
    out
}

fn to_rstar_boxes(v: &[(u32, Aabb3D<f64>)]) -> Vec<Rectangle<[f64; 3]>> {
    v.iter()
        .map(|(_, b)| Rectangle::from_corners([b.min_x, b.min_y, b.min_z], [b.max_x, b.max_y, b.max_z]))
        .collect()
}

fn bench_rtree_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare");
    for &n in &[32usize, 64] {
        let boxes = gen_grid_boxes(n, 10.0);
        let extent = n as f64 * 10.0;
        let points: Vec<[f64; 3]> = (0..256)
            .map(|i| {
                let t = i as f64 / 256.0;
                [t * extent, 32.0, (1.0 - t) * extent]
            })
            .collect();
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("precinct_build_query_n{}", n), |b| {
            b.iter_batched(
                || boxes.clone(),
                |boxes| {
                    let tree = PartitionTree::bulk(TreeConfig::default(), boxes);
                    let hits: usize = points
                        .iter()
                        .map(|p| tree.query_point(p[0], p[1], p[2]).count())
                        .sum();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_boxes(&boxes),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let hits: usize = points.iter().map(|p| tree.locate_all_at_point(p).count()).sum();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare);
criterion_main!(benches);
