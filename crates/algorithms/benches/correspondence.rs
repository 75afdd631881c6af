//! Benchmarks for label/cluster correspondence

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hypereval_algorithms::correspondence::resolve_correspondence;
use hypereval_core::{ClassId, Grid, LabeledGrid, PredictionGrid};

const N_CLASSES: ClassId = 16;

/// Banded scene with uneven class widths, and predictions using a shifted numbering
fn create_scene(size: usize) -> (LabeledGrid, PredictionGrid) {
    let band = |row: usize, col: usize| (((row * 3 + col) * (row + 1)) % 97) as ClassId % N_CLASSES;
    let labels = Grid::from_vec(
        (0..size * size).map(|k| band(k / size, k % size)).collect(),
        size,
        size,
    )
    .unwrap();
    let preds = labels.map(|label| (label + 5) % N_CLASSES);
    (labels, preds)
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("correspondence/resolve");
    for size in [128, 256, 512, 1024] {
        let (labels, preds) = create_scene(size);
        let n_cluster = hypereval_algorithms::correspondence::distinct_count(&labels);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| resolve_correspondence(black_box(&labels), black_box(&preds), n_cluster).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
