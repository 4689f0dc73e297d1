//! Partlens CLI - validate and scaffold viewer configuration files

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use partlens_core::{parse_log_level, CameraFraming, LabelTable, Sign, ViewerConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "partlens")]
#[command(about = "Configuration tooling for the partlens model viewer")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a configuration file
    Check {
        /// Path to configuration file (.toml or .json)
        config: PathBuf,
    },
    /// List the part table: labels, camera framings and slider bindings
    Parts {
        config: PathBuf,
    },
    /// Write a default configuration file
    Init {
        #[arg(default_value = "partlens.toml")]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = parse_log_level(&args.log_level).context("Invalid --log-level")?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Check { config } => check(&config),
        Command::Parts { config } => parts(&config),
        Command::Init { config, force } => init(&config, force),
    }
}

fn load(path: &Path) -> Result<ViewerConfig> {
    ViewerConfig::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn check(path: &Path) -> Result<()> {
    let config = load(path)?;
    let framing = CameraFraming::from_config(&config)?;
    let labels = LabelTable::from_config(&config);

    println!("{}: OK", path.display());
    println!("  Model:     {}", config.model.path);
    println!("  Parts:     {} ({} labelled, {} framed)", config.parts.len(), labels.len(), framing.len());
    println!("  Bindings:  {}", config.slider.bindings.len());
    println!(
        "  Slider:    {} .. {}",
        config.slider.min, config.slider.max
    );

    // Bindings for parts the table does not know about are legal (the model
    // may still contain them) but usually a typo
    for binding in &config.slider.bindings {
        if !config.parts.iter().any(|p| p.id == binding.part) {
            println!("  note: slider part \"{}\" has no part entry", binding.part);
        }
    }

    info!("Configuration valid");
    Ok(())
}

fn parts(path: &Path) -> Result<()> {
    let config = load(path)?;
    let framing = CameraFraming::from_config(&config)?;
    let labels = LabelTable::from_config(&config);

    println!("{:<20} {:<22} {}", "ID", "LABEL", "CAMERA");
    for part in &config.parts {
        let camera = match framing.get(&part.id) {
            Some(p) => format!("[{:.2}, {:.2}, {:.2}]", p.x, p.y, p.z),
            None => "default".to_string(),
        };
        println!("{:<20} {:<22} {}", part.id, labels.label_for(&part.id), camera);
    }

    let d = framing.default_position();
    println!();
    println!("Default camera: [{:.2}, {:.2}, {:.2}]", d.x, d.y, d.z);

    if !config.slider.bindings.is_empty() {
        println!();
        println!("Slider bindings:");
        for binding in &config.slider.bindings {
            let sign = match binding.sign {
                Sign::Positive => "+",
                Sign::Negative => "-",
            };
            println!("  {:<20} {}{:?}", binding.part, sign, binding.axis);
        }
    }

    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    ViewerConfig::default()
        .to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
