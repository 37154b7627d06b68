use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::SplitMix64;
use tracing::{debug, info};

use crate::{
    background::TextureSet,
    fonts::FontCache,
    generator::DatasetItemGenerator,
    io::OutputSink,
    render::{ComposeConfig, OutputMode},
};

mod background;
mod fonts;
mod generator;
mod geom;
mod io;
mod layout;
mod logging;
mod record;
mod render;
mod text;

/// Renders random symbol strings over textures and writes YOLO labels for
/// every glyph.
#[derive(Parser, Debug)]
#[command(name = "synthgen", version)]
struct Args {
    /// Number of images to generate
    #[arg(long, default_value_t = 100)]
    count: u32,

    #[arg(long = "font_path")]
    font_path: PathBuf,

    #[arg(long = "texture_path")]
    texture_path: PathBuf,

    #[arg(long = "save_path")]
    save_path: PathBuf,

    #[arg(long, default_value_t = 240)]
    width: u32,

    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Upper bound (exclusive) of symbols per image
    #[arg(long = "letter_num", default_value_t = 8,
          value_parser = clap::value_parser!(u32).range(1..))]
    letter_num: u32,

    /// Textures must exceed the canvas by this much to be cropped
    #[arg(long, default_value_t = 50)]
    margin: u32,

    /// Outline glyph boxes instead of saving
    #[arg(long)]
    show: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    save: bool,

    /// Also append one JSON line per saved image to manifest.jsonl
    #[arg(long)]
    manifest: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    info!("{args:?}");

    let cfg = ComposeConfig {
        width: args.width,
        height: args.height,
        margin: args.margin,
        letter_num: args.letter_num as usize,
        ..ComposeConfig::default()
    };
    let mode = OutputMode::from_flags(args.show, args.save);

    let textures = TextureSet::load(&args.texture_path).context("failed to load textures")?;
    let fonts = FontCache::load(&args.font_path).context("failed to load fonts")?;
    info!("{} textures, {} fonts, mode {mode:?}", textures.len(), fonts.len());

    let sink = OutputSink::new(&args.save_path).with_manifest(args.manifest);
    let mut generator = DatasetItemGenerator::new(&cfg, textures, fonts, sink, mode);
    let mut sm = SplitMix64::seed_from_u64(args.seed.unwrap_or_else(rand::random));

    for i in 0..args.count {
        let seed = sm.next_u64();
        let scene = generator
            .generate_with_seed(seed)
            .with_context(|| format!("image {i} (seed {seed})"))?;
        debug!("image {i}: {:?}", scene.text);

        if (i + 1) % 100 == 0 {
            info!("{}/{} images", i + 1, args.count);
        }
    }

    generator.finalize_output().context("failed to finalize output")?;
    info!("done: {} images in {}", args.count, args.save_path.display());
    Ok(())
}
