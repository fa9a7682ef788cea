/// Example: Build a PowerPoint deck from a JSON design plan.
///
/// Images are looked up by keyword in `--images`, icons as `<slug>.svg` in
/// `--icons`. Builder settings can be overridden with a YAML file.
///
/// Usage:
///   cargo run --example build_deck -- plan.json -o deck.pptx --images assets/img --icons assets/icons
use clap::Parser;
use deckweave::deck::{BuilderConfig, DeckBuilder, DirectoryImageProvider, FsIconLibrary};
use deckweave::plan::DeckPlan;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Assemble a PPTX deck from a design plan")]
struct Args {
    /// Design plan (JSON)
    plan: PathBuf,
    /// Output presentation
    #[arg(short, long, default_value = "deck.pptx")]
    output: PathBuf,
    /// Builder configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory of keyword-named images
    #[arg(long)]
    images: Option<PathBuf>,
    /// Directory of keyword-named SVG icons
    #[arg(long)]
    icons: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => BuilderConfig::from_yaml_file(path)?,
        None => BuilderConfig::default(),
    };
    let plan = DeckPlan::from_json_file(&args.plan)?;

    let mut builder = DeckBuilder::new(config);
    if let Some(dir) = args.images {
        builder = builder.with_image_provider(DirectoryImageProvider::new(dir));
    }
    if let Some(dir) = args.icons {
        builder = builder.with_icon_provider(FsIconLibrary::new(dir));
    }

    let report = builder.build(&plan);
    builder.save(&args.output)?;

    println!("Wrote {}", args.output.display());
    println!("  Slides:     {}", report.pages);
    println!("  Rendered:   {}", report.rendered);
    println!("  Skipped:    {}", report.skipped);
    println!("  Animations: {}", report.animations);
    Ok(())
}
