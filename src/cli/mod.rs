//! Command-line interface
//!
//! `train` runs the full compare loop on a dataset; `info` prints a quick
//! dataset summary without training anything.

use clap::{Parser, Subcommand};
use colored::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::artifact::ArtifactStore;
use crate::data::DataLoader;
use crate::report::TrainingReport;
use crate::spec::parse_specs;
use crate::training::{ComparisonConfig, ComparisonEngine};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString { s.truecolor(100, 210, 120) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "clfbench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and compare classifiers over one shared split")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train one or more classifiers and report their metrics
    Train {
        /// Input data file (.csv, .tsv or .bin container)
        #[arg(short, long)]
        data: PathBuf,

        /// Model specs, e.g. "knn", "lr:C=2,max_iter=500", or "all"
        #[arg(short, long, required = true)]
        models: Vec<String>,

        /// Label column name
        #[arg(short, long)]
        label_col: String,

        /// Feature column holding array literals (required for CSV input)
        #[arg(short, long)]
        feature_col: Option<String>,

        /// Held-out fraction for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Shuffle seed for the stratified split
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Save the best model under this name
        #[arg(long)]
        save_model: Option<String>,

        /// Directory for markdown reports
        #[arg(long, default_value = "outputs/reports")]
        report_dir: PathBuf,

        /// Directory for saved models
        #[arg(long, default_value = "outputs/models")]
        model_dir: PathBuf,
    },

    /// Show dataset information
    Info {
        /// Input data file (.csv, .tsv or .bin container)
        #[arg(short, long)]
        data: PathBuf,

        /// Label column name
        #[arg(short, long)]
        label_col: String,

        /// Feature column holding array literals (required for CSV input)
        #[arg(short, long)]
        feature_col: Option<String>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn cmd_train(
    data_path: &Path,
    models: &[String],
    label_col: &str,
    feature_col: Option<&str>,
    test_size: f64,
    seed: u64,
    save_model: Option<&str>,
    report_dir: &Path,
    model_dir: &Path,
) -> anyhow::Result<()> {
    section("Train");

    step_run("Loading data");
    let start = Instant::now();
    let (x, labels) = DataLoader::load(data_path, feature_col, label_col)?;
    step_done(&format!(
        "{} samples × {} features in {:?}",
        x.nrows(),
        x.ncols(),
        start.elapsed()
    ));

    let configs = parse_specs(models)?;

    step_run(&format!("Training {} model(s)", configs.len()));
    let start = Instant::now();
    let engine = ComparisonEngine::new(ComparisonConfig {
        test_fraction: test_size,
        seed,
    });
    let outcome = engine.run(&x, &labels, &configs)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!(
        "  {:<24} {:>9} {:>10} {:>8} {:>9}",
        muted("Model"),
        muted("Accuracy"),
        muted("Precision"),
        muted("Recall"),
        muted("F1-score")
    );
    println!("  {}", dim(&"─".repeat(64)));
    for (name, m) in &outcome.results {
        println!(
            "  {:<24} {:>9.3} {:>10.3} {:>8.3} {:>9.3}",
            name, m.accuracy, m.precision, m.recall, m.f1
        );
    }
    println!("  {}", dim(&"─".repeat(64)));

    let Some(best) = outcome.best.clone() else {
        println!("  {}", "no models were evaluated".yellow());
        return Ok(());
    };
    println!();
    println!("  {} {}", ok("best"), best.white().bold());

    let report = TrainingReport {
        timestamp: chrono::Local::now(),
        sample_count: outcome.sample_count,
        feature_count: outcome.feature_count,
        test_fraction: test_size,
        per_model: outcome.results.clone(),
        best_model_name: best.clone(),
    };
    let report_path = report.write_to(report_dir)?;
    println!("  {} {}", muted("report"), report_path.display());

    if let Some(artifact_name) = save_model {
        let model = outcome
            .best_model()
            .ok_or_else(|| anyhow::anyhow!("best model '{best}' missing from outcome"))?;
        let saved = ArtifactStore::new(model_dir).save(artifact_name, model)?;
        println!("  {} {}", muted("model"), saved.display());
    }

    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path, label_col: &str, feature_col: Option<&str>) -> anyhow::Result<()> {
    section("Info");

    step_run("Loading data");
    let (x, labels) = DataLoader::load(data_path, feature_col, label_col)?;
    step_done(&format!("{} samples × {} features", x.nrows(), x.ncols()));

    let mut class_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in &labels {
        *class_counts.entry(label.as_str()).or_insert(0) += 1;
    }

    println!();
    println!("  {:<16} {}", muted("Samples"), x.nrows().to_string().white());
    println!("  {:<16} {}", muted("Features"), x.ncols().to_string().white());
    println!(
        "  {:<16} {}",
        muted("Classes"),
        class_counts.len().to_string().white()
    );

    println!();
    println!("  {:<24} {:>8}", muted("Class"), muted("Count"));
    println!("  {}", dim(&"─".repeat(34)));
    for (class, count) in &class_counts {
        println!("  {:<24} {:>8}", class, count);
    }

    println!();
    Ok(())
}
