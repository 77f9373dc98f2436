//! fitplot CLI - render chart views and accuracy metrics from a project file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fitplot_core::{build_chart, ChartView};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod loader;
mod project;
mod report;

use config::{FitplotConfig, OutputFormat};
use loader::Workspace;

#[derive(Parser)]
#[command(name = "fitplot")]
#[command(about = "Plot columns across datasets and report goodness-of-fit")]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build chart views and print them
    Render {
        /// Project file or directory containing fitplot.toml
        #[arg(default_value = ".")]
        project: PathBuf,

        /// Only render the chart with this id
        #[arg(short, long)]
        chart: Option<String>,

        /// Print JSON instead of the configured format
        #[arg(long)]
        json: bool,
    },

    /// List loaded datasets and their columns
    Columns {
        /// Project file or directory containing fitplot.toml
        #[arg(default_value = ".")]
        project: PathBuf,
    },

    /// Create a starter project
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(project: &Path) -> Result<(Workspace, OutputFormat)> {
    let (config, base) = FitplotConfig::load(project)?;
    let format = config.output.format;
    Ok((Workspace::load(config, &base)?, format))
}

fn render(project: PathBuf, chart: Option<String>, json: bool) -> Result<()> {
    let (ws, format) = load(&project)?;
    let charts: Vec<_> = match &chart {
        Some(id) => vec![ws
            .chart(id)
            .with_context(|| format!("No chart with id `{id}`"))?],
        None => ws.charts.iter().collect(),
    };

    let views: Vec<ChartView> = charts
        .into_iter()
        .map(|c| build_chart(c, &ws.datasets))
        .collect();
    debug!("built {} view(s)", views.len());

    if json || format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        for view in &views {
            print!("{}", report::render_chart(view));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            project,
            chart,
            json,
        } => render(project, chart, json),
        Commands::Columns { project } => {
            let (ws, _) = load(&project)?;
            print!("{}", report::render_columns(&ws.datasets));
            Ok(())
        }
        Commands::Init { path, name } => {
            let name = name.unwrap_or_else(|| {
                path.canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| "fitplot-project".to_string())
            });
            project::create_project(&path, &name)?;
            println!("Created {} in {}", config::PROJECT_FILE, path.display());
            Ok(())
        }
    }
}
