use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use tilesheet::atlas::AtlasBuilder;
use tilesheet::cli::{BuildArgs, CliArgs, Command, CompressionLevel, InitArgs, MatchArgs};
use tilesheet::config::{
    AtlasParams, CompressConfig, LoadedConfig, TilesheetConfig, relative_pattern, save_config,
};
use tilesheet::error::exit_code;
use tilesheet::matching::match_shadows;
use tilesheet::output::{AtlasMetadata, atlas_png_filename, save_png, write_json};
use tilesheet::sprite::{check_input_limits, collect_image_paths, input_name, load_inputs};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();
    let preview = cli.command.is_preview();

    match &cli.command {
        Command::Export(args) | Command::Preview(args) => build(args, preview),
        Command::Match(args) => show_matches(args),
        Command::Init(args) => init_config(args),
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn build(args: &BuildArgs, preview: bool) -> Result<()> {
    let merged = merge_config_with_args(args)?;
    init_logging(merged.verbose);

    info!("Tilesheet v{}", env!("CARGO_PKG_VERSION"));

    // Reject bad parameters before reading any files
    merged.params.validate()?;

    let sprite_paths = collect_image_paths(&merged.sprites)?;
    let sprites = load_inputs(&sprite_paths)?;
    check_input_limits(&sprites)?;

    let shadows = if merged.params.use_shadow_images {
        let shadows = load_inputs(&collect_image_paths(&merged.shadows)?)?;
        if shadows.is_empty() {
            warn!("Shadow images enabled but none were supplied");
        }
        shadows
    } else {
        Vec::new()
    };

    let background = match &merged.background {
        Some(path) if merged.params.use_background => {
            load_inputs(std::slice::from_ref(path))?.pop()
        }
        _ => None,
    };

    let built = AtlasBuilder::new(merged.params.clone()).build(
        &sprites,
        &shadows,
        background.as_ref(),
    )?;

    for ignored in &built.report.ignored {
        warn!("Ignored {}: {}", ignored.name, ignored.reason);
    }
    for sprite in &built.report.shadow_missing {
        warn!("No shadow image for {}", sprite);
    }
    for ambiguous in &built.report.shadow_ambiguous {
        warn!(
            "Several shadow images for {}: {}",
            ambiguous.sprite,
            ambiguous.candidates.join(", ")
        );
    }

    if !merged.output.exists() {
        fs::create_dir_all(&merged.output).with_context(|| {
            format!("failed to create output directory: {}", merged.output.display())
        })?;
    }

    let file_name = atlas_png_filename(&merged.name, preview);
    let image_path = merged.output.join(&file_name);
    let mut metadata = AtlasMetadata::new(&built.atlas, &built.report, file_name);

    if preview {
        let image = built.atlas.preview(merged.params.preview_max_width);
        save_png(&image, &image_path, merged.compress)?;
        metadata = metadata.image_size(image.width(), image.height());
    } else {
        save_png(&built.atlas.image, &image_path, merged.compress)?;
    }
    info!("Saved {}", image_path.display());

    let json_path = write_json(&metadata, &merged.output, &merged.name)?;
    info!("Generated {}", json_path.display());

    info!("Done!");

    Ok(())
}

#[allow(clippy::print_stdout)]
fn show_matches(args: &MatchArgs) -> Result<()> {
    init_logging(args.verbose);

    let sprite_names = file_names(&collect_image_paths(&args.sprites)?);
    let shadow_names = file_names(&collect_image_paths(&args.shadows)?);
    let matches = match_shadows(&sprite_names, &shadow_names);

    for sprite in &sprite_names {
        match matches.shadow_for(sprite) {
            Some(shadow) => println!("{} -> {}", sprite, shadow),
            None => println!("{} -> (missing)", sprite),
        }
    }
    for ambiguous in &matches.ambiguous {
        println!(
            "{}: ambiguous between {}",
            ambiguous.sprite,
            ambiguous.candidates.join(", ")
        );
    }

    info!(
        "{} matched, {} missing, {} ambiguous",
        matches.matches.len(),
        matches.missing.len(),
        matches.ambiguous.len()
    );
    Ok(())
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| input_name(p)).collect()
}

fn init_config(args: &InitArgs) -> Result<()> {
    init_logging(false);

    let config_dir = args.path.parent().unwrap_or_else(|| Path::new(""));
    let relative = |patterns: &[String]| -> Vec<String> {
        patterns
            .iter()
            .map(|p| relative_pattern(p, config_dir))
            .collect()
    };

    let config = TilesheetConfig {
        sprites: relative(&args.sprites),
        shadows: relative(&args.shadows),
        params: AtlasParams {
            use_shadow_images: !args.shadows.is_empty(),
            ..Default::default()
        },
        ..Default::default()
    };

    save_config(&config, &args.path, args.force)?;
    info!("Wrote {}", args.path.display());
    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    sprites: Vec<PathBuf>,
    shadows: Vec<PathBuf>,
    background: Option<PathBuf>,
    output: PathBuf,
    name: String,
    params: AtlasParams,
    compress: Option<CompressionLevel>,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &BuildArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Inputs: CLI args override config
    let sprites = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_sprites()
            .context("failed to resolve sprite files from config")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        Vec::new()
    };

    let shadows = if !args.shadows.is_empty() {
        args.shadows.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_shadows()
            .context("failed to resolve shadow files from config")?
    } else {
        Vec::new()
    };

    let background = args.background.clone().or_else(|| {
        loaded_config
            .as_ref()
            .and_then(LoadedConfig::resolve_background)
    });

    // Output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    // Name: CLI > config > default
    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or_else(|| "atlas".to_string())
    });

    let mut params = loaded_config
        .as_ref()
        .map(|lc| lc.config.params.clone())
        .unwrap_or_default();
    apply_param_overrides(&mut params, args);

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.config.compress.as_ref().map(|c| match c {
            CompressConfig::Level(n) => CompressionLevel::Level(*n),
            CompressConfig::Max(_) => CompressionLevel::Max,
        })
    } else {
        None
    };

    Ok(MergedConfig {
        sprites,
        shadows,
        background,
        output,
        name,
        params,
        compress,
        verbose: args.verbose,
    })
}

/// Overwrite config (or default) parameters with whatever the CLI set
fn apply_param_overrides(params: &mut AtlasParams, args: &BuildArgs) {
    if let Some(tile_size) = args.tile_size {
        params.tile_size = tile_size;
    }
    if let Some(width) = args.width {
        params.width = width;
    }
    if let Some(sample) = args.sample {
        params.sample = sample;
    }
    if let Some(outline) = args.outline {
        params.outline = outline;
    }
    if let Some(color) = &args.remove_color {
        params.remove_color = Some(color.clone());
    }
    if let Some(scale) = args.shadow_scale {
        params.shadow_scale = scale;
    }
    if let Some(policy) = args.missing_shadow {
        params.missing_shadow_policy = policy;
    }
    if let Some(max_width) = args.preview_max_width {
        params.preview_max_width = max_width;
    }

    // Supplying the files on the command line turns the feature on
    if args.shadow_images || !args.shadows.is_empty() {
        params.use_shadow_images = true;
    }
    if args.background.is_some() {
        params.use_background = true;
    }
}
