use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use workflow_check::{CatalogConfig, GraphModel, SchemaCatalog, extract, validate};

/// Validate node-graph workflows against a host's node schema catalog
#[derive(Parser)]
#[command(name = "workflow-check")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a workflow file
    Validate {
        /// Workflow JSON file, or `-` for stdin
        workflow_file: PathBuf,

        /// Host root URL to fetch node schemas from
        #[arg(long, env = "WORKFLOW_CHECK_HOST")]
        host: Option<String>,

        /// Saved schema payload to use instead of contacting the host.
        /// Takes precedence over `--host`.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Recover a workflow from free text (e.g. a chat reply)
    Extract {
        /// Text file, or `-` for stdin
        input: PathBuf,
    },

    /// Print node ids in dependency order
    Order {
        /// Workflow JSON file, or `-` for stdin
        workflow_file: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            workflow_file,
            host,
            catalog,
            json,
        } => run_validate(&workflow_file, host, catalog, json),
        Commands::Extract { input } => {
            let text = read_input(&input)?;
            let Some(graph) = extract(&text) else {
                bail!("no workflow found in {}", input.display());
            };
            println!("{}", graph.to_text());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Order { workflow_file } => {
            let graph = load_workflow(&workflow_file)?;
            let Some(order) = graph.link_graph().execution_order() else {
                bail!("workflow links form a cycle");
            };
            for id in order {
                println!("{}", id);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_validate(
    workflow_file: &Path,
    host: Option<String>,
    catalog_file: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let graph = load_workflow(workflow_file)?;

    if let (Some(host), Some(path)) = (&host, &catalog_file) {
        tracing::debug!(host = %host, catalog = %path.display(), "using saved catalog, host ignored");
    }

    let mut config = CatalogConfig::default();
    if let Some(host) = host {
        config = config.with_base_url(host);
    }
    let catalog = SchemaCatalog::new(config);

    match catalog_file {
        Some(path) => {
            let payload: serde_json::Value = serde_json::from_str(&read_input(&path)?)
                .with_context(|| format!("failed to parse schema payload: {}", path.display()))?;
            catalog
                .load_payload(&payload)
                .with_context(|| format!("invalid schema payload: {}", path.display()))?;
        }
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            if !rt.block_on(catalog.refresh()) {
                eprintln!(
                    "could not reach {}; running structural checks only",
                    catalog.config().schema_url()
                );
            }
        }
    }

    let report = validate(&graph, &catalog);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render_for_agent());
    }

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_workflow(path: &Path) -> Result<GraphModel> {
    let text = read_input(path)?;
    GraphModel::parse(&text)
        .with_context(|| format!("failed to parse workflow file: {}", path.display()))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
