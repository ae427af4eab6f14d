use std::path::PathBuf;

use clap::Parser;

/// Assign keycap colors to key groups using patterns learned from a reference corpus.
#[derive(Parser, Debug)]
#[command(name = "capsmith", version, about)]
pub struct Args {
    /// Requested colors: `#RRGGBB` hex values or color codes such as `CR`
    #[arg(required_unless_present = "request")]
    pub colors: Vec<String>,

    /// Reference corpus (JSON list of keycap sets)
    #[arg(short, long)]
    pub corpus: PathBuf,

    /// Read the request from a JSON file instead of positional colors
    #[arg(short, long, conflicts_with = "colors")]
    pub request: Option<PathBuf>,

    /// Recolor this keycap set's layout instead of learning a pattern
    #[arg(short, long)]
    pub base: Option<String>,

    /// Layout of the reference keycap set to recolor
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Ignore any reference layout named by the request
    #[arg(long, conflicts_with = "base")]
    pub no_base: bool,

    /// Engine configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of requested colors
    #[arg(long)]
    pub max_colors: Option<usize>,

    /// Minimum legend contrast ratio against the body color
    #[arg(long)]
    pub min_contrast: Option<f64>,

    /// Write the assignment to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a colored terminal preview of the assignment to stderr
    #[arg(long)]
    pub preview: bool,

    /// Print only the cache key of the requested colors
    #[arg(long)]
    pub cache_key: bool,
}
