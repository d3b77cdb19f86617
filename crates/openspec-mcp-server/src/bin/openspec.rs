use anyhow::{Context, Result};
use atty::Stream;
use clap::{Parser, Subcommand};
use colored::Colorize;
use openspec_core::{classify, ProjectType};
use openspec_mcp_server::debug_logger::DebugLogger;
use openspec_mcp_server::{
    ConfigManager, GenerateSpecRequest, OpenSpecConfig, OpenSpecMcpServer, OptimizeCodeRequest,
};
use rmcp::ServiceExt;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, Registry};

#[derive(Parser)]
#[command(
    name = "openspec",
    version,
    author,
    about = "OpenSpec Forge - requirement-driven spec generation over MCP",
    long_about = "Classifies project descriptions, generates OpenSpec specification and task templates, and scores code against a specification. Runs as an MCP server over stdio or as a one-shot CLI."
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    verbose: bool,

    #[arg(long, global = true, help = "Configuration file path")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start MCP server with specified transport")]
    Start {
        #[command(subcommand)]
        transport: TransportType,
    },

    #[command(about = "Classify a description into project type, features and complexity")]
    Classify {
        #[arg(help = "Project description")]
        text: String,

        #[arg(long, help = "Show as JSON")]
        json: bool,
    },

    #[command(about = "Generate spec and task templates for a requirements text")]
    Generate {
        #[arg(help = "Requirements text")]
        text: String,

        #[arg(long, help = "Override the detected project type (unknown names use custom)")]
        project_type: Option<String>,
    },

    #[command(about = "Score code against a spec and print the optimization report")]
    Optimize {
        #[arg(long, help = "File containing the code to optimize")]
        code: PathBuf,

        #[arg(long, help = "File containing the OpenSpec specification")]
        spec: PathBuf,

        #[arg(long, help = "Additional optimization feedback")]
        feedback: Option<String>,
    },

    #[command(about = "Configuration helpers")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TransportType {
    #[command(about = "Serve MCP over stdin/stdout")]
    Stdio,
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Print an example configuration file")]
    Example,

    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(long, help = "Show as JSON")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Enabled with OPENSPEC_DEBUG=1
    DebugLogger::init();

    let cli = Cli::parse();

    let config =
        ConfigManager::load_config(cli.config.clone()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Start { transport } => match transport {
            TransportType::Stdio => handle_start_stdio(config).await?,
        },
        Commands::Classify { text, json } => {
            init_cli_logging(&config, cli.verbose);
            handle_classify(&text, json)?;
        }
        Commands::Generate { text, project_type } => {
            init_cli_logging(&config, cli.verbose);
            let server = OpenSpecMcpServer::new(config);
            let report = server
                .handle_generate_spec(GenerateSpecRequest {
                    requirements: text,
                    project_type: project_type.as_deref().map(ProjectType::parse_or_custom),
                })
                .await;
            println!("{}", report);
        }
        Commands::Optimize {
            code,
            spec,
            feedback,
        } => {
            init_cli_logging(&config, cli.verbose);
            let code = std::fs::read_to_string(&code)
                .with_context(|| format!("Failed to read code file {}", code.display()))?;
            let spec = std::fs::read_to_string(&spec)
                .with_context(|| format!("Failed to read spec file {}", spec.display()))?;
            let server = OpenSpecMcpServer::new(config);
            let report = server
                .handle_optimize_code(OptimizeCodeRequest {
                    code,
                    spec,
                    feedback,
                })
                .await;
            println!("{}", report);
        }
        Commands::Config { action } => match action {
            ConfigAction::Example => {
                print!("{}", ConfigManager::generate_example_config());
            }
            ConfigAction::Show { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("{}", ConfigManager::get_config_summary(&config));
                }
            }
        },
    }

    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// One-shot commands log to stderr so stdout carries only the report.
fn init_cli_logging(config: &OpenSpecConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let subscriber = Registry::default().with(env_filter(level)).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(Stream::Stderr)),
    );
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn handle_start_stdio(config: OpenSpecConfig) -> Result<()> {
    // stdout is the protocol channel; logs go to a file
    let log_dir = config.server.log_dir.clone();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "mcp-server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = Registry::default()
        .with(env_filter(&config.server.log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_line_number(true),
        );
    tracing::subscriber::set_global_default(subscriber).ok();

    // Keep the guard alive for the duration of the server
    std::mem::forget(_guard);

    if atty::is(Stream::Stderr) {
        eprintln!("{}", "Starting OpenSpec MCP Server...".green().bold());
        eprintln!("{}", ConfigManager::get_config_summary(&config));
    }
    info!("{}", ConfigManager::get_config_summary(&config));

    let server = OpenSpecMcpServer::new(config);

    let service = server.serve(rmcp::transport::stdio()).await.map_err(|e| {
        if atty::is(Stream::Stderr) {
            eprintln!("{}", format!("❌ Failed to start MCP server: {}", e).red());
        }
        anyhow::anyhow!("MCP server startup failed: {}", e)
    })?;

    if atty::is(Stream::Stderr) {
        eprintln!("🚀 OpenSpec MCP server ready");
        eprintln!("🔧 Tools: create_openspec_project, generate_openspec_spec, optimize_code_by_spec");
    }

    service
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("MCP server stopped");
    Ok(())
}

fn handle_classify(text: &str, json: bool) -> Result<()> {
    let profile = classify(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("{} {}", "🏗️ Project type:".cyan(), profile.project_type);
    println!("{} {}", "🎯 Complexity:".cyan(), profile.complexity);
    if profile.features.is_empty() {
        println!("{} -", "✨ Features:".cyan());
    } else {
        let features: Vec<_> = profile.features.iter().map(|f| f.as_str()).collect();
        println!("{} {}", "✨ Features:".cyan(), features.join(", "));
    }
    Ok(())
}
