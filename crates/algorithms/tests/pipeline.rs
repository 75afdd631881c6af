//! End-to-end evaluation of a synthetic scene.
//!
//! The scene is a 6×8 grid with background (`0`) and three classes of
//! distinct populations. A "perfect" clusterer that only renames classes
//! is simulated, so every evaluation step has a known outcome.

use hypereval_algorithms::prelude::*;
use hypereval_core::cube_to_samples;
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const ROWS: usize = 6;
const COLS: usize = 8;
const BANDS: usize = 5;

/// Background 5 cells, class 1: 8, class 2: 15, class 3: 20
fn scene_labels() -> LabeledGrid {
    let mut values: Vec<ClassId> = [(0, 5), (1, 8), (2, 15), (3, 20)]
        .iter()
        .flat_map(|&(class, n)| std::iter::repeat(class).take(n))
        .collect();
    values.shuffle(&mut StdRng::seed_from_u64(3));
    Grid::from_vec(values, ROWS, COLS).unwrap()
}

fn scene_cube(labels: &LabeledGrid) -> Array3<f64> {
    Array3::from_shape_fn((ROWS, COLS, BANDS), |(r, c, b)| {
        let class = labels.get(r, c).unwrap() as f64;
        class * 10.0 + b as f64 + ((r * 5 + c * 3 + b) % 7) as f64 * 0.01
    })
}

/// Clusterer output for the classified samples: classes 1, 2, 3 become
/// clusters 2, 0, 1.
fn rename_clusters(y: &[ClassId]) -> Vec<ClassId> {
    y.iter().map(|&c| [0, 2, 0, 1][c as usize]).collect()
}

#[test]
fn test_perfect_clustering_scores_one() {
    let labels = scene_labels();
    let samples = cube_to_samples(scene_cube(&labels).view()).unwrap();

    let (x, flat_index) = mask_input(samples.view(), &labels).unwrap();
    assert_eq!(x.dim(), (43, BANDS));
    assert_eq!(flat_index.len(), 43);

    let flat = labels.to_flat_vec();
    let y: Vec<ClassId> = flat_index.iter().map(|&k| flat[k]).collect();
    let clusters = rename_clusters(&y);

    let raw_preds = unmask(&clusters, &flat_index, labels.shape(), 0).unwrap();
    let preds = mask_predictions(&raw_preds, &labels).unwrap();
    for (label, pred) in labels.iter().zip(preds.iter()) {
        assert_eq!(label == UNCLASSIFIED, pred == 0);
    }

    let n_cluster = distinct_count(&labels);
    assert_eq!(n_cluster, 4);
    let aligned = resolve_correspondence(&labels, &preds, n_cluster).unwrap();

    for (label, pred) in aligned.labels.iter().zip(aligned.preds.iter()) {
        assert!((1..=4).contains(&label));
        if pred != 0 {
            assert_eq!(label, pred);
        }
    }

    // Score the aligned predictions over classified pixels
    let classified: Vec<(ClassId, ClassId)> = labels
        .iter()
        .zip(aligned.labels.iter().zip(aligned.preds.iter()))
        .filter(|&(raw, _)| raw != UNCLASSIFIED)
        .map(|(_, pair)| pair)
        .collect();
    let y_true: Vec<ClassId> = classified.iter().map(|&(l, _)| l).collect();
    let x_pred = Array2::from_shape_fn((classified.len(), 1), |(k, _)| classified[k].1 as f64);
    let class_ids: Vec<ClassId> = ClassCounts::from_values(y_true.iter().copied())
        .values()
        .to_vec();
    assert_eq!(class_ids.len(), 3);

    let report = mean_score(&class_ids, x_pred.view(), &y_true, &AgreementScorer).unwrap();
    assert!((report.mean - 1.0).abs() < 1e-12);
}

#[test]
fn test_split_after_masking() {
    let labels = scene_labels();
    let samples = cube_to_samples(scene_cube(&labels).view()).unwrap();
    let (x, flat_index) = mask_input(samples.view(), &labels).unwrap();
    let flat = labels.to_flat_vec();
    let y: Vec<ClassId> = flat_index.iter().map(|&k| flat[k]).collect();

    let params = SplitParams::default();
    let mut rng = StdRng::seed_from_u64(params.seed);
    let ds = stratified_split(x.view(), &y, params, &mut rng).unwrap();

    // floor(8 * .75) + floor(15 * .75) + floor(20 * .75)
    assert_eq!(ds.summary.train_total(), 6 + 11 + 15);
    assert_eq!(ds.summary.test_total(), 2 + 4 + 5);
    assert_eq!(ds.x_train.ncols(), BANDS);

    // Each sample keeps its class: band 0 encodes the class
    for (row, &class) in ds.x_train.rows().into_iter().zip(&ds.y_train) {
        assert_eq!((row[0] / 10.0).floor() as ClassId, class);
    }

    // Same seed, same split
    let mut rng = StdRng::seed_from_u64(params.seed);
    let again = stratified_split(x.view(), &y, params, &mut rng).unwrap();
    assert_eq!(again.x_train, ds.x_train);
    assert_eq!(again.y_test, ds.y_test);
}

#[test]
fn test_reduction_of_masked_samples() {
    let labels = scene_labels();
    let samples = cube_to_samples(scene_cube(&labels).view()).unwrap();
    let (x, _) = mask_input(samples.view(), &labels).unwrap();

    let threshold = ReductionParams::default().variance_threshold;
    let n = Pca.choose_n_components(x.view(), threshold).unwrap();
    assert!(n < BANDS);

    let reduced = Pca.reduce(x.view(), n.max(1)).unwrap();
    assert_eq!(reduced.nrows(), x.nrows());
}

#[test]
fn test_outlier_roundtrip() {
    let labels = scene_labels();
    let cube = scene_cube(&labels);
    let outliers: OutlierSet = [(0, 0), (2, 5), (5, 7)].into_iter().collect();

    let (x, positions) = exclude_outliers(cube.view(), &outliers).unwrap();
    assert_eq!(x.nrows(), ROWS * COLS - 3);

    let first_band: Vec<f64> = x.column(0).to_vec();
    let rebuilt = reconstruct(&first_band, &positions, &outliers, (ROWS, COLS)).unwrap();
    for r in 0..ROWS {
        for c in 0..COLS {
            let expected = if outliers.contains(&(r, c)) {
                0.0
            } else {
                cube[[r, c, 0]]
            };
            assert_eq!(rebuilt.get(r, c).unwrap(), expected);
        }
    }

    // The same bookkeeping applies to a label grid
    let (values, grid_positions) = exclude_outliers_grid(&labels, &outliers);
    assert_eq!(grid_positions, positions);
    let rebuilt = reconstruct(&values, &grid_positions, &outliers, labels.shape()).unwrap();
    assert_eq!(rebuilt.get(2, 5).unwrap(), 0);
    assert_eq!(rebuilt.get(1, 1).unwrap(), labels.get(1, 1).unwrap());
}
