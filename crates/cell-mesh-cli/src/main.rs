//! cell-mesh CLI: load a closed cell mesh and report its geometry.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use cell_mesh::{MeshConfig, MeshError, MeshResult};

mod commands;
mod output;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "cell-mesh")]
#[command(version, about = "Closed cell mesh loading and inspection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print counts, areas and volume of a mesh.
    Info(SourceArgs),

    /// Check a mesh and print a validation report.
    Validate(SourceArgs),
}

/// Where the mesh comes from.
#[derive(Args)]
struct SourceArgs {
    /// Path to an OFF file. Overrides `source` from the config file.
    path: Option<PathBuf>,

    /// Target sphere radius. Overrides `radius` from the config file.
    #[arg(short, long)]
    radius: Option<f64>,

    /// TOML config naming the source file and radius.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    fn resolve(&self) -> MeshResult<MeshConfig> {
        let mut config = match (&self.config, &self.path) {
            (Some(config_path), _) => MeshConfig::from_toml_file(config_path)?,
            (None, Some(path)) => MeshConfig::new(path, 1.0),
            (None, None) => {
                return Err(MeshError::InvalidConfig {
                    details: "either a mesh path or --config is required".to_string(),
                })
            }
        };
        if let Some(path) = &self.path {
            config.source = path.clone();
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Info(source) => source
            .resolve()
            .and_then(|config| commands::info::run(&config, cli.format, cli.quiet))
            .map(|()| true),
        Commands::Validate(source) => source
            .resolve()
            .and_then(|config| commands::validate::run(&config, cli.format, cli.quiet)),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
