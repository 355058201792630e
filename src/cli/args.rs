use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::MissingShadowPolicy;

#[derive(Parser, Debug)]
#[command(name = "tilesheet")]
#[command(version, about = "Tile-grid sprite atlas builder", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the full-resolution atlas and its JSON metadata
    Export(BuildArgs),
    /// Build the atlas but write a downscaled preview image
    Preview(BuildArgs),
    /// Show which shadow image each sprite resolves to
    Match(MatchArgs),
    /// Write a project config file with default parameters
    Init(InitArgs),
}

impl Command {
    /// True for the subcommand that writes a preview-sized image
    pub fn is_preview(&self) -> bool {
        matches!(self, Command::Preview(_))
    }
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Sprite image files or directories, in atlas order
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a tilesheet project config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Shadow image files or directories (enables image shadows)
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub shadows: Vec<PathBuf>,

    /// Background image drawn behind every sprite
    #[arg(long, value_name = "FILE")]
    pub background: Option<PathBuf>,

    /// Output directory for atlas files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (atlas.png, atlas.json) [default: atlas]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Tile edge length in pixels [default: 52]
    #[arg(short = 't', long)]
    pub tile_size: Option<u32>,

    /// Atlas width in tiles [default: 6]
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Keep every Nth sprite [default: 1]
    #[arg(long)]
    pub sample: Option<u32>,

    /// Soft outline width in pixels [default: 0]
    #[arg(long)]
    pub outline: Option<u32>,

    /// Make this color transparent (hex, e.g. #ff00ff)
    #[arg(long, value_name = "HEX")]
    pub remove_color: Option<String>,

    /// Synthesize a shadow scaled by this factor [default: 0]
    #[arg(long, value_name = "FACTOR")]
    pub shadow_scale: Option<f32>,

    /// Use shadow images even when the config file turns them off
    #[arg(long)]
    pub shadow_images: bool,

    /// What to do with sprites that have no shadow image [default: skip-shadow]
    #[arg(long, value_enum)]
    pub missing_shadow: Option<MissingShadowPolicy>,

    /// Widest preview image in pixels [default: 1024]
    #[arg(long, value_name = "PIXELS")]
    pub preview_max_width: Option<u32>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Sprite image files or directories
    #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
    pub sprites: Vec<PathBuf>,

    /// Shadow image files or directories
    #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
    pub shadows: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Path of the config file to create
    #[arg(default_value = "tilesheet.json")]
    pub path: PathBuf,

    /// Sprite paths or glob patterns to list in the config
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub sprites: Vec<String>,

    /// Shadow paths or glob patterns to list in the config
    #[arg(long, value_name = "PATTERN", num_args = 1..)]
    pub shadows: Vec<String>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            return Ok(CompressionLevel::Max);
        }
        let n = s
            .parse::<u8>()
            .map_err(|_e| format!("invalid compression level: {}", s))?;
        if n <= 6 {
            Ok(CompressionLevel::Level(n))
        } else {
            Err(format!("compression level must be 0-6 or 'max', got {}", n))
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
