//! Benchmarks for the reconstruction pipeline.

use criterion::{criterion_group, criterion_main, Criterion};
use endfoot::algo::{deduplicate_seeds, KdTreeIndex, NearestVertexIndex, RelocationOptions};
use endfoot::prelude::*;
use nalgebra::Point3;

/// Seeds spread over the grid, every fourth one doubled to force collisions.
fn grid_seeds(n: usize, count: usize) -> Vec<Point3<f64>> {
    let mut seeds = Vec::with_capacity(count + count / 4);
    for k in 0..count {
        let x = ((k * 37) % n) as f64 + 0.2;
        let y = ((k * 53) % n) as f64 + 0.3;
        seeds.push(Point3::new(x, y, 0.1));
        if k % 4 == 0 {
            seeds.push(Point3::new(x + 0.05, y - 0.05, 0.1));
        }
    }
    seeds
}

fn bench_adjacency(c: &mut Criterion) {
    let mesh = shapes::grid(100, 1.0).unwrap();

    c.bench_function("flatten_grid_100x100", |b| {
        b.iter(|| MeshGraph::from_mesh(&mesh).unwrap());
    });
}

fn bench_seed_placement(c: &mut Criterion) {
    let mesh = shapes::grid(100, 1.0).unwrap();
    let graph = MeshGraph::from_mesh(&mesh).unwrap();
    let index = KdTreeIndex::new(mesh.positions()).unwrap();
    let seeds = grid_seeds(100, 100);

    c.bench_function("nearest_125_seeds", |b| {
        b.iter(|| index.nearest(&seeds));
    });

    let mapping = index.nearest(&seeds);
    c.bench_function("deduplicate_125_seeds", |b| {
        b.iter(|| deduplicate_seeds(&graph, &mapping, &RelocationOptions::default()).unwrap());
    });
}

fn bench_marching(c: &mut Criterion) {
    let mesh = shapes::grid(100, 1.0).unwrap();
    let graph = MeshGraph::from_mesh(&mesh).unwrap();
    let seeds: Vec<usize> = (0..50).map(|k| (k * 199) % graph.num_vertices()).collect();

    c.bench_function("fast_marching_50_fronts", |b| {
        let solver = FastMarching::default();
        b.iter(|| solver.grow(&graph, &seeds, 100.0).unwrap());
    });

    c.bench_function("dijkstra_50_fronts", |b| {
        let solver = FastMarching::default().with_triangle_updates(false);
        b.iter(|| solver.grow(&graph, &seeds, 100.0).unwrap());
    });
}

fn bench_batch(c: &mut Criterion) {
    let mesh = shapes::tube(60, 48, 1.0, 12.0).unwrap();
    let seed_sets: Vec<Vec<Point3<f64>>> = (0..8)
        .map(|s| {
            (0..20)
                .map(|k| {
                    let angle = (k * 7 + s) as f64 * 0.41;
                    let z = ((k * 13 + s * 3) % 120) as f64 * 0.1;
                    Point3::new(1.1 * angle.cos(), 1.1 * angle.sin(), z)
                })
                .collect()
        })
        .collect();
    let options = ReconstructOptions::new(2.0);
    let solver = FastMarching::default();

    c.bench_function("batch_8_sets_parallel", |b| {
        b.iter(|| reconstruct_batch(&mesh, &seed_sets, &options, &solver).unwrap());
    });

    let sequential = options.clone().sequential();
    c.bench_function("batch_8_sets_sequential", |b| {
        b.iter(|| reconstruct_batch(&mesh, &seed_sets, &sequential, &solver).unwrap());
    });
}

criterion_group!(
    benches,
    bench_adjacency,
    bench_seed_placement,
    bench_marching,
    bench_batch
);
criterion_main!(benches);
