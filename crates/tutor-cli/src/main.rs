//! Tutor orchestrator CLI
//!
//! Usage:
//!   tutor serve                  Start the HTTP gateway
//!   tutor ask -m "..." -p p.yml  Run one message through the pipeline
//!   tutor demo [--interactive]   Canned scenarios with mock tools
//!   tutor tools                  List the educational tools

mod demo;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tutor_agents::tools::TOOL_CATALOG;
use tutor_common::{ConversationTurn, LearnerProfile};
use tutor_config::{AppConfig, ConfigLoader};
use tutor_gateway::state::AppState;
use tutor_gateway::{GatewayServer, build_orchestrator};
use tutor_security::RedactingWriter;

/// Routes student messages to educational tools
#[derive(Parser)]
#[command(name = "tutor", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.tutor/config.yml)
    #[arg(long, short, env = "TUTOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Use canned tool responses instead of the tool APIs
        #[arg(long)]
        mock_tools: bool,
    },

    /// Run a single message through the pipeline and print the response
    Ask {
        /// The student's message
        #[arg(long, short)]
        message: String,
        /// Learner profile (YAML or JSON)
        #[arg(long, short)]
        profile: PathBuf,
        /// Prior conversation turns (JSON array of {role, content})
        #[arg(long)]
        history: Option<PathBuf>,
        #[arg(long)]
        mock_tools: bool,
    },

    /// Run the demo scenarios against mock tools
    Demo {
        /// Type your own messages instead of running the scenarios
        #[arg(long, short)]
        interactive: bool,
    },

    /// List the available educational tools
    Tools,
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_writer(RedactingWriter::stderr())
        .with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the config and report which file it came from, if any.
fn load_config(path: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>)> {
    let loader = match path {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("failed to load configuration")?;
    Ok((config, loader.source()))
}

fn read_profile(path: &Path) -> Result<LearnerProfile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    // YAML is a superset of JSON, so one parser covers both.
    serde_yaml::from_str(&raw).with_context(|| format!("invalid profile {}", path.display()))
}

fn read_history(path: &Path) -> Result<Vec<ConversationTurn>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid history {}", path.display()))
}

fn print_tools() {
    println!("Available tools:\n");
    for tool in TOOL_CATALOG {
        println!("  {:<22} {}", tool.name.as_str(), tool.description);
        println!("  {:<22} required: {}", "", tool.required_params.join(", "));
        if !tool.optional_params.is_empty() {
            println!("  {:<22} optional: {}", "", tool.optional_params.join(", "));
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = load_config(cli.config.as_deref())?;
    init_tracing(&config.log.level, cli.log_json);
    match &source {
        Some(path) => info!("loaded config from {}", path.display()),
        None => info!("no config file found, using defaults"),
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            mock_tools,
        } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            config.tools.use_mock |= mock_tools;

            let orchestrator = build_orchestrator(&config)?;
            let state = Arc::new(AppState::new(config, orchestrator));
            GatewayServer::new(state).run().await?;
        }
        Commands::Ask {
            message,
            profile,
            history,
            mock_tools,
        } => {
            config.tools.use_mock |= mock_tools;
            let profile = read_profile(&profile)?;
            let history = match history {
                Some(path) => read_history(&path)?,
                None => Vec::new(),
            };

            let orchestrator = build_orchestrator(&config)?;
            let response = orchestrator.orchestrate(&message, &profile, &history).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Demo { interactive } => {
            config.tools.use_mock = true;
            let orchestrator = build_orchestrator(&config)?;
            info!("demo initialized with mock tools");

            if interactive {
                demo::run_interactive(&orchestrator).await?;
            } else {
                demo::run_all(&orchestrator).await;
            }
        }
        Commands::Tools => print_tools(),
    }

    Ok(())
}
