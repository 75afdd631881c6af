//! HyperEval CLI - evaluate hyperspectral clustering against ground truth

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use hypereval_algorithms::correspondence::{distinct_count, resolve_correspondence, ClassCounts};
use hypereval_algorithms::masking::{
    exclude_outliers_grid, isolate_class, mask_predictions, reconstruct, UNCLASSIFIED,
};
use hypereval_algorithms::scoring::{mean_score, AgreementScorer};
use hypereval_algorithms::split::{stratified_split, SplitParams};
use hypereval_core::io::{read_grid, write_grid};
use hypereval_core::{ClassId, GridPos, LabeledGrid, OutlierSet};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hypereval")]
#[command(author, version, about = "Evaluate hyperspectral clustering against ground truth", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the class populations of a label grid
    Info {
        /// Label grid (single-band integer TIFF)
        labels: PathBuf,
    },
    /// Set predictions to 0 on unclassified pixels, shift the rest by one
    Mask {
        /// Prediction grid
        preds: PathBuf,
        /// Ground-truth label grid
        labels: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Keep a single class of a label grid
    Isolate {
        /// Label grid
        labels: PathBuf,
        /// Class to keep
        #[arg(short, long)]
        class: ClassId,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Renumber labels and clusters onto a shared id space
    Align {
        /// Ground-truth label grid
        labels: PathBuf,
        /// Prediction grid (cluster ids starting at 0)
        preds: PathBuf,
        /// Number of clusters (default: number of distinct labels)
        #[arg(short, long)]
        n_cluster: Option<usize>,
        /// Output file for the renumbered labels
        #[arg(long)]
        out_labels: PathBuf,
        /// Output file for the renumbered predictions
        #[arg(long)]
        out_preds: PathBuf,
    },
    /// Align, then report per-class agreement over classified pixels
    Evaluate {
        /// Ground-truth label grid
        labels: PathBuf,
        /// Prediction grid (cluster ids starting at 0)
        preds: PathBuf,
        /// Number of clusters (default: number of distinct labels)
        #[arg(short, long)]
        n_cluster: Option<usize>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stratified train/test split of the classified pixels
    Split {
        /// Ground-truth label grid
        labels: PathBuf,
        /// Fraction of each class assigned to train [default: 0.75]
        #[arg(short, long)]
        train_fraction: Option<f64>,
        /// Shuffle seed [default: 42]
        #[arg(short, long)]
        seed: Option<u64>,
        /// Write train/test pixel positions to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reinsert outlier pixels (as 0) into a grid
    Rebuild {
        /// Input grid
        values: PathBuf,
        /// JSON list of outlier positions, e.g. [[0, 3], [5, 1]]
        #[arg(long)]
        outliers: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Train/test pixel positions written by `split --output`
#[derive(Serialize)]
struct SplitPositions {
    train: Vec<GridPos>,
    test: Vec<GridPos>,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_labels(path: &Path) -> Result<LabeledGrid> {
    let pb = spinner("Reading grid...");
    let grid = read_grid(path).with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", grid.cols(), grid.rows());
    Ok(grid)
}

fn write_labels(grid: &LabeledGrid, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_grid(grid, path).with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn read_outliers(path: &Path) -> Result<OutlierSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let positions: Vec<GridPos> =
        serde_json::from_str(&text).context("Outliers must be a JSON list of [row, col] pairs")?;
    let outliers: OutlierSet = positions.iter().copied().collect();
    if outliers.len() != positions.len() {
        warn!(
            "{} duplicate outlier positions ignored",
            positions.len() - outliers.len()
        );
    }
    Ok(outliers)
}

fn resolve_n_cluster(labels: &LabeledGrid, n_cluster: Option<usize>) -> usize {
    n_cluster.unwrap_or_else(|| {
        let n = distinct_count(labels);
        debug!("n_cluster defaults to {} distinct labels", n);
        n
    })
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { labels } => {
            let grid = read_labels(&labels)?;
            let counts = ClassCounts::from_grid(&grid);

            println!("File: {}", labels.display());
            println!("Dimensions: {} x {} ({} cells)", grid.cols(), grid.rows(), grid.len());
            println!("Distinct values: {}", counts.len());
            println!("\n{:>8}  {:>10}  {:>7}", "Class", "Pixels", "Share");
            for (class, count) in counts.iter() {
                println!(
                    "{:>8}  {:>10}  {:>6.2}%",
                    class,
                    count,
                    100.0 * count as f64 / grid.len().max(1) as f64
                );
            }
            if !counts.contains(UNCLASSIFIED) {
                println!("\nNo unclassified (0) pixels");
            }
        }

        // ── Mask ─────────────────────────────────────────────────────
        Commands::Mask {
            preds,
            labels,
            output,
        } => {
            let preds = read_labels(&preds)?;
            let labels = read_labels(&labels)?;
            let start = Instant::now();
            let masked = mask_predictions(&preds, &labels).context("Failed to mask predictions")?;
            let elapsed = start.elapsed();
            write_labels(&masked, &output)?;
            done("Masked predictions", &output, elapsed);
        }

        // ── Isolate ──────────────────────────────────────────────────
        Commands::Isolate {
            labels,
            class,
            output,
        } => {
            let grid = read_labels(&labels)?;
            let start = Instant::now();
            let isolated = isolate_class(&grid, class);
            let elapsed = start.elapsed();
            let kept = isolated.iter().filter(|&v| v == class).count();
            if kept == 0 {
                warn!("Class {} does not occur in {}", class, labels.display());
            }
            write_labels(&isolated, &output)?;
            done(&format!("Class {} ({} pixels)", class, kept), &output, elapsed);
        }

        // ── Align ────────────────────────────────────────────────────
        Commands::Align {
            labels,
            preds,
            n_cluster,
            out_labels,
            out_preds,
        } => {
            let labels = read_labels(&labels)?;
            let preds = read_labels(&preds)?;
            let n_cluster = resolve_n_cluster(&labels, n_cluster);

            let start = Instant::now();
            let aligned = resolve_correspondence(&labels, &preds, n_cluster)
                .context("Failed to resolve label/cluster correspondence")?;
            let elapsed = start.elapsed();

            println!("{:>10}  {:>10}", "Raw label", "Canonical");
            for (raw, id) in &aligned.label_mapping {
                println!("{:>10}  {:>10}", raw, id);
            }
            println!("\n{:>10}  {:>10}", "Cluster", "Canonical");
            for (raw, id) in &aligned.pred_mapping {
                println!("{:>10}  {:>10}", raw, id);
            }
            println!();

            write_labels(&aligned.labels, &out_labels)?;
            write_labels(&aligned.preds, &out_preds)?;
            done("Aligned labels", &out_labels, elapsed);
            done("Aligned predictions", &out_preds, elapsed);
        }

        // ── Evaluate ─────────────────────────────────────────────────
        Commands::Evaluate {
            labels,
            preds,
            n_cluster,
            json,
        } => {
            let labels = read_labels(&labels)?;
            let preds = read_labels(&preds)?;
            let n_cluster = resolve_n_cluster(&labels, n_cluster);

            let aligned = resolve_correspondence(&labels, &preds, n_cluster)
                .context("Failed to resolve label/cluster correspondence")?;

            // Only classified pixels take part in the score
            let pairs: Vec<(ClassId, ClassId)> = labels
                .iter()
                .zip(aligned.labels.iter().zip(aligned.preds.iter()))
                .filter(|&(raw, _)| raw != UNCLASSIFIED)
                .map(|(_, pair)| pair)
                .collect();
            if pairs.is_empty() {
                anyhow::bail!("No classified pixels to evaluate");
            }

            let y: Vec<ClassId> = pairs.iter().map(|&(label, _)| label).collect();
            let x = Array2::from_shape_fn((pairs.len(), 1), |(k, _)| pairs[k].1 as f64);
            let class_ids = ClassCounts::from_values(y.iter().copied()).values().to_vec();

            let report = mean_score(&class_ids, x.view(), &y, &AgreementScorer)
                .context("Failed to score classes")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }

        // ── Split ────────────────────────────────────────────────────
        Commands::Split {
            labels,
            train_fraction,
            seed,
            output,
            json,
        } => {
            let grid = read_labels(&labels)?;
            let defaults = SplitParams::default();
            let params = SplitParams {
                train_fraction: train_fraction.unwrap_or(defaults.train_fraction),
                seed: seed.unwrap_or(defaults.seed),
            };

            // Pixel coordinates as the two features, so the split can be
            // traced back onto the grid
            let index = grid.index();
            let (positions, y): (Vec<GridPos>, Vec<ClassId>) = index
                .positions()
                .zip(grid.iter())
                .filter(|&(_, label)| label != UNCLASSIFIED)
                .unzip();
            let x = Array2::from_shape_fn((positions.len(), 2), |(k, axis)| {
                let (row, col) = positions[k];
                if axis == 0 { row as f64 } else { col as f64 }
            });

            let mut rng = StdRng::seed_from_u64(params.seed);
            let start = Instant::now();
            let ds = stratified_split(x.view(), &y, params, &mut rng)
                .context("Failed to split samples")?;
            let elapsed = start.elapsed();
            info!(
                train = ds.summary.train_total(),
                test = ds.summary.test_total(),
                "split {} classified pixels in {:.2?}",
                y.len(),
                elapsed
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&ds.summary)?);
            } else {
                print!("{}", ds.summary);
            }

            if let Some(output) = output {
                let to_positions = |m: &Array2<f64>| -> Vec<GridPos> {
                    m.rows()
                        .into_iter()
                        .map(|r| (r[0] as usize, r[1] as usize))
                        .collect()
                };
                let split_positions = SplitPositions {
                    train: to_positions(&ds.x_train),
                    test: to_positions(&ds.x_test),
                };
                let text = serde_json::to_string(&split_positions)?;
                std::fs::write(&output, text)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                done("Split positions", &output, elapsed);
            }
        }

        // ── Rebuild ──────────────────────────────────────────────────
        Commands::Rebuild {
            values,
            outliers,
            output,
        } => {
            let grid = read_labels(&values)?;
            let outliers = read_outliers(&outliers)?;
            outliers
                .ensure_within(&grid.index())
                .context("Outlier position outside the grid")?;

            let start = Instant::now();
            let (retained, positions) = exclude_outliers_grid(&grid, &outliers);
            let rebuilt = reconstruct(&retained, &positions, &outliers, grid.shape())
                .context("Failed to reconstruct grid")?;
            let elapsed = start.elapsed();
            info!("{} outlier pixels set to 0", outliers.len());

            write_labels(&rebuilt, &output)?;
            done("Rebuilt grid", &output, elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_split_flags_are_optional() {
        let cli = Cli::try_parse_from(["hypereval", "split", "labels.tif"]).unwrap();
        match cli.command {
            Commands::Split {
                train_fraction,
                seed,
                json,
                ..
            } => {
                assert!(train_fraction.is_none());
                assert!(seed.is_none());
                assert!(!json);
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_read_outliers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outliers.json");
        std::fs::write(&path, "[[0, 1], [2, 3], [0, 1]]").unwrap();

        let outliers = read_outliers(&path).unwrap();
        assert_eq!(outliers.len(), 2);
        assert!(outliers.contains(&(2, 3)));

        std::fs::write(&path, "{\"row\": 1}").unwrap();
        assert!(read_outliers(&path).is_err());
    }
}
