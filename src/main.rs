use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use capsmith::cli::Args;
use capsmith::corpus::{ColorInput, Corpus, Request};
use capsmith::{generate, preview, ColorTable, EngineConfig};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capsmith=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(max_colors) = args.max_colors {
        config.max_colors = max_colors;
    }
    if let Some(min_contrast) = args.min_contrast {
        config.min_legend_contrast = min_contrast;
    }

    let corpus = Corpus::load(&args.corpus)
        .with_context(|| format!("failed to load corpus: {}", args.corpus.display()))?;

    let mut request = match &args.request {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read request: {}", path.display()))?;
            Request::from_json(&json)?
        }
        None => Request::new(args.colors.iter().map(|c| ColorInput::parse(c)).collect()),
    };
    if args.base.is_some() {
        request.base_layout_keycap = args.base.clone();
    }
    if args.layout.is_some() {
        request.base_layout_name = args.layout.clone();
    }
    if args.no_base {
        request.use_base_image_colors = false;
    }

    let outcome = generate(&corpus, &request, &config)?;

    if args.cache_key {
        println!("{}", outcome.cache_key);
        return Ok(());
    }

    if args.preview {
        let table = ColorTable::from_corpus(&corpus);
        preview::render(&outcome.assignment, &table, &mut std::io::stderr().lock())
            .context("failed to write preview")?;
    }

    let json = serde_json::to_string_pretty(&outcome)?;
    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write assignment to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
