use anyhow::{Context, bail};
use chainforge::{ImageConfig, Manifest, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chainforge")]
#[command(about = "Default, validate and compile blockchain node specs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the manifest with every default filled in.
    Default {
        #[arg(long)]
        manifest: String,

        /// JSON file of image overrides: { "images": { "BESU_IMAGE": "..." } }
        #[arg(long)]
        config: Option<String>,
    },
    /// Report every violation; fails when there is at least one.
    Validate {
        #[arg(long)]
        manifest: String,

        /// Previous version of the manifest; validates an update instead of a create.
        #[arg(long)]
        old: Option<String>,

        #[arg(long)]
        config: Option<String>,
    },
    /// Default, validate and print the compiled nodes as JSON.
    Compile {
        #[arg(long)]
        manifest: String,

        #[arg(long)]
        config: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Environment overrides first, then the config file on top.
fn load_images(config: Option<&str>) -> Result<ImageConfig> {
    let images = ImageConfig::from_env();
    match config {
        Some(path) => Ok(images.merge(ImageConfig::from_file(path)?)),
        None => Ok(images),
    }
}

fn load_manifest(path: &str) -> Result<Manifest> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read manifest {}", path))?;
    let manifest: Manifest =
        serde_json::from_str(&text).with_context(|| format!("parse manifest {}", path))?;
    Ok(manifest)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Default { manifest, config } => {
            let images = load_images(config.as_deref())?;
            let mut manifest = load_manifest(&manifest)?;
            manifest.apply_defaults(&images);
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Commands::Validate {
            manifest,
            old,
            config,
        } => {
            let images = load_images(config.as_deref())?;
            let mut manifest = load_manifest(&manifest)?;
            manifest.apply_defaults(&images);

            let errors = match old {
                Some(old) => {
                    let mut old = load_manifest(&old)?;
                    old.apply_defaults(&images);
                    manifest.validate_update(&old)
                }
                None => manifest.validate_create(),
            };

            if errors.is_empty() {
                println!("{} {:?} is valid", manifest.kind(), manifest.name());
                return Ok(());
            }
            for err in errors.iter() {
                println!("{}", err);
            }
            bail!(
                "{} {:?} has {} violation(s)",
                manifest.kind(),
                manifest.name(),
                errors.len()
            );
        }
        Commands::Compile { manifest, config } => {
            let images = load_images(config.as_deref())?;
            let mut manifest = load_manifest(&manifest)?;
            let nodes = manifest.admit(&images, None)?;
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
    }

    Ok(())
}
