use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use labels::{LabelOptions, convert_all, extract, mat::MatStore};
use tracing::info;

mod logging;

/// Converts SVHN `digitStruct.mat` annotations into YOLO label files.
#[derive(Parser, Debug)]
#[command(name = "svhn2yolo", version)]
struct Args {
    /// Path to the digitStruct.mat file
    #[arg(long = "mat_path")]
    mat_path: PathBuf,

    /// Folder containing the images referenced by the annotations
    #[arg(long = "images_dir")]
    images_dir: PathBuf,

    /// Folder where the label files are written
    #[arg(long = "labels_dir")]
    labels_dir: PathBuf,

    /// Clamp normalized values into [0, 1]
    #[arg(long)]
    clamp: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    info!("{args:?}");

    let store = MatStore::open(&args.mat_path)
        .with_context(|| format!("failed to open {}", args.mat_path.display()))?;
    let records = extract(&store).context("failed to read annotations")?;
    info!("{} annotation records", records.len());

    let opts = LabelOptions { clamp: args.clamp };
    let summary = convert_all(&records, &args.images_dir, &args.labels_dir, opts)
        .with_context(|| format!("failed to write labels to {}", args.labels_dir.display()))?;

    info!(
        "done: {} label files written, {} images missing",
        summary.written, summary.skipped
    );
    Ok(())
}
