//! Feature importance report over a labeled CSV dataset.
//!
//! Runs the full offline pipeline (clinical features, statistical features,
//! preprocessing) and ranks every transformed feature by ANOVA F-score
//! against `high_risk`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin analyze_features -- [--input data/raw/synthetic_mh_data.csv] [--top 15] [--json]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use insightmap::adapters::csv::CsvDataset;
use insightmap::application::TrainingAnalysis;

#[derive(Parser)]
#[command(name = "analyze_features", about = "Rank features against the high-risk label")]
struct Cli {
    /// Input CSV path
    #[arg(long, default_value = "data/raw/synthetic_mh_data.csv")]
    input: PathBuf,

    /// Number of features to show
    #[arg(long, default_value_t = 15)]
    top: usize,

    /// Print the full ranking as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = insightmap::logging::init()?;

    let dataset = CsvDataset::new(&cli.input);
    let (output, ranking) = TrainingAnalysis::new()
        .run(&dataset)
        .with_context(|| format!("Feature analysis failed for {:?}", cli.input))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
        return Ok(());
    }

    println!(
        "Final shape: ({}, {})",
        output.matrix.n_rows(),
        output.matrix.n_features()
    );
    println!();
    println!("{:<40} {:>12} {:>12}", "feature", "f_score", "p_value");
    for item in ranking.iter().take(cli.top) {
        println!(
            "{:<40} {:>12.4} {:>12.3e}",
            item.feature, item.f_score, item.p_value
        );
    }
    Ok(())
}
