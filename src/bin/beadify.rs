use clap::Parser;
use std::fs;
use std::path::PathBuf;
use image_to_bead_pattern_wasm::{BeadCount, GridSpec, generate_pattern_bytes};
use anyhow::Context;
use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Turn images into numbered bead-craft patterns.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths (JPEG, PNG)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of bead rows
    #[arg(short, long, default_value_t = 35)]
    rows: u32,

    /// Number of bead columns
    #[arg(short, long, default_value_t = 35)]
    cols: u32,

    /// Rendered pixel size of one bead
    #[arg(short = 's', long, default_value_t = 25)]
    cell_size: u32,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "bead_layout_")]
    prefix: String,

    /// Print bead counts as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Table row for one bead color; `#` is the 1-based palette number.
fn bead_line(bead: &BeadCount) -> String {
    format!("  #{:<2} {}  x{}", bead.number(), bead.hex(), bead.count)
}

/// JSON entry for one bead color, numbered like [`bead_line`].
fn bead_json(bead: &BeadCount) -> serde_json::Value {
    serde_json::json!({ "number": bead.number(), "hex": bead.hex(), "count": bead.count })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let grid = GridSpec::new(args.rows, args.cols, args.cell_size);
    debug!(?grid, "using grid");

    let mut reports = Vec::new();
    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let pattern = generate_pattern_bytes(&bytes, &grid)
            .with_context(|| format!("bead pattern generation failed for {}", input.display()))?;

        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let out_path = if let Some(dir) = &args.out_dir {
            dir.join(format!("{stem}.png"))
        } else {
            PathBuf::from(format!("{}{stem}.png", args.prefix))
        };

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, &pattern.png)
            .with_context(|| format!("writing {}", out_path.display()))?;
        info!(path = %out_path.display(), "saved bead pattern");

        if args.json {
            let counts: Vec<_> = pattern
                .counts
                .iter()
                .map(bead_json)
                .collect();
            reports.push(serde_json::json!({
                "input": input.display().to_string(),
                "output": out_path.display().to_string(),
                "rows": grid.rows,
                "cols": grid.cols,
                "beads": counts,
            }));
        } else {
            println!("{} → {}", input.display(), out_path.display());
            for bead in &pattern.counts {
                println!("{}", bead_line(bead));
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
