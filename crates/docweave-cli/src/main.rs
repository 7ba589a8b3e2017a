//! Docweave CLI - document synthesis and knowledge graph exploration

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use docweave_core::commands::graph::{self, GraphQuery};
use docweave_core::commands::synthesis;
use docweave_core::config::Config;
use docweave_core::domain::graph::NodeKind;
use docweave_core::domain::interaction::GraphController;
use docweave_core::pipeline::AnalysisOutcome;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "docweave")]
#[command(author, version, about = "Document intelligence and knowledge graph engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize insights, relationships, contradictions, timeline and gaps
    Synthesize {
        /// JSON file with an array of analyzed documents
        file: PathBuf,
    },

    /// Show the knowledge graph as an outline
    Graph {
        file: PathBuf,
        /// Only show nodes whose label or text contains this term
        #[arg(short, long)]
        search: Option<String>,
        /// Node kinds to show (repeatable)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Vec<NodeKind>,
        /// ASCII characters only
        #[arg(long)]
        ascii: bool,
        /// Show canvas positions
        #[arg(long)]
        positions: bool,
    },

    /// Show knowledge graph statistics
    Stats { file: PathBuf },

    /// Export the knowledge graph as JSON
    Export {
        file: PathBuf,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

fn parse_kind(s: &str) -> Result<NodeKind, String> {
    NodeKind::parse(s).ok_or_else(|| {
        let valid: Vec<&str> = NodeKind::all().iter().map(|k| k.as_str()).collect();
        format!("unknown node kind '{}' (expected one of: {})", s, valid.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docweave=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synthesize { file } => cmd_synthesize(&file, cli.format, cli.quiet).await,

        Commands::Graph {
            file,
            search,
            kind,
            ascii,
            positions,
        } => {
            let query = GraphQuery {
                search,
                kinds: kind,
                ascii,
                show_positions: positions,
            };
            cmd_graph(&file, &query, cli.format, cli.quiet).await
        }

        Commands::Stats { file } => cmd_stats(&file, cli.quiet).await,

        Commands::Export { file, output } => cmd_export(&file, output.as_deref(), cli.quiet).await,

        Commands::Config { action } => cmd_config(action, cli.quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn analyze(file: &Path, quiet: bool) -> anyhow::Result<(Config, AnalysisOutcome)> {
    let config = Config::load()?;
    debug!(path = %file.display(), "Loading documents");

    match graph::analyze_file(&config, file).await {
        Ok(outcome) => {
            info!(
                documents = outcome.documents.len(),
                nodes = outcome.graph.node_count(),
                "Documents analyzed"
            );
            Ok((config, outcome))
        }
        Err(e) => {
            if !quiet {
                eprintln!("Error [{}]: {}", e.code(), e);
                if let Some(suggestion) = e.suggestion() {
                    eprintln!("Hint: {}", suggestion);
                }
            }
            Err(e.into())
        }
    }
}

async fn cmd_synthesize(file: &Path, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let (_, outcome) = analyze(file, quiet).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.synthesis)?);
        }
        OutputFormat::Text => {
            print!("{}", synthesis::format_report(&outcome.documents, &outcome.synthesis));
        }
    }
    Ok(())
}

async fn cmd_graph(
    file: &Path,
    query: &GraphQuery,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let (config, outcome) = analyze(file, quiet).await?;

    match format {
        OutputFormat::Json => {
            let snapshot = graph::query_graph(outcome.graph, &config, query);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Text => {
            print!("{}", graph::format_graph(outcome.graph, &config, query));
        }
    }
    Ok(())
}

async fn cmd_stats(file: &Path, quiet: bool) -> anyhow::Result<()> {
    let (_, outcome) = analyze(file, quiet).await?;
    let stats = graph::get_stats(&outcome.graph);
    print!("{}", graph::format_stats(&stats));
    Ok(())
}

async fn cmd_export(file: &Path, output: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let (config, outcome) = analyze(file, quiet).await?;
    let controller = GraphController::with_graph(outcome.graph, config.canvas.bounds());
    let json = controller.export_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            if !quiet {
                println!("Exported graph to {}", path.display());
            }
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
