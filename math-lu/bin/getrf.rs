//! Factorize a dense matrix read from JSON
//!
//! Usage:
//!     cargo run -p math-audio-lu --bin getrf -- --input matrix.json --lanes 8
//!
//! The input file holds the matrix row by row:
//!     { "rows": [[4.0, 3.0], [6.0, 3.0]] }

use anyhow::{Context, bail};
use clap::Parser;
use math_audio_lu::{LuConfig, SingularPolicy, lu_nopivot};
use ndarray::Array2;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI arguments for the no-pivot LU factorization
#[derive(Parser)]
#[command(name = "getrf")]
#[command(about = "LU decomposition without pivoting over row-cyclic lanes")]
struct Args {
    /// JSON file with the matrix ({"rows": [[...], ...]})
    #[arg(short, long)]
    input: PathBuf,

    /// JSON configuration file (fields not given keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of computation lanes (overrides the config file)
    #[arg(short, long)]
    lanes: Option<usize>,

    /// Fail on the first singular pivot instead of reporting it
    #[arg(long)]
    strict: bool,

    /// Pivot magnitude at or below which a pivot is singular
    #[arg(long)]
    tolerance: Option<f64>,

    /// Write the factors as JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Deserialize)]
struct MatrixFile {
    rows: Vec<Vec<f64>>,
}

fn read_matrix(path: &Path) -> anyhow::Result<Array2<f64>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: MatrixFile =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    let m = file.rows.len();
    let n = file.rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = file.rows.iter().enumerate().find(|(_, r)| r.len() != n) {
        bail!("row {} has {} entries, expected {}", i, row.len(), n);
    }
    let data: Vec<f64> = file.rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((m, n), data)?)
}

fn to_rows(a: &Array2<f64>) -> Vec<Vec<f64>> {
    a.rows().into_iter().map(|r| r.to_vec()).collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LuConfig::from_json_file(path)?,
        None => LuConfig::default(),
    };
    if let Some(lanes) = args.lanes {
        config.lanes = lanes;
    }
    if let Some(tolerance) = args.tolerance {
        config.pivot_tolerance = tolerance;
    }
    if args.strict {
        config.singular_policy = SingularPolicy::Strict;
    }
    config.validate()?;

    let a = read_matrix(&args.input)?;
    log::info!(
        "Factorizing {}x{} matrix over {} lanes",
        a.nrows(),
        a.ncols(),
        config.lanes
    );
    let lu = lu_nopivot(&a, &config)?;

    let result = serde_json::json!({
        "info": lu.report.info(),
        "steps": lu.report.stats.steps,
        "min_pivot_magnitude": lu.report.stats.min_pivot_magnitude,
        "lanes": lu.report.lanes,
        "lu": to_rows(&lu.lu),
        "lower": to_rows(&lu.lower()),
        "upper": to_rows(&lu.upper()),
    });
    let text = serde_json::to_string_pretty(&result)?;

    match &args.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            println!("Factors written to {}", path.display());
        }
        None => println!("{}", text),
    }

    if lu.report.info() != 0 {
        eprintln!(
            "warning: singular pivot at step {} (info = {})",
            lu.report.info() - 1,
            lu.report.info()
        );
    }

    Ok(())
}
