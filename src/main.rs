use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reportforge::config::Config;
use reportforge::gateway::{run_gateway, AppState};
use reportforge::state::RunState;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "reportforge", version, about = "Plan-execution engine for an autonomous report agent")]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Plan a task and print the step list as JSON
    Plan {
        /// Natural-language task description
        task: String,
    },
    /// Plan a task and execute it locally, printing result and logs
    Run {
        /// Natural-language task description
        task: String,
        /// Tabular source file (XLSX or CSV) to ingest
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let mut config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            run_gateway(&config).await
        }
        Command::Plan { task } => {
            let state = AppState::from_config(&config);
            let plan = state.planner.plan(&task).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Command::Run { task, file } => {
            let app = AppState::from_config(&config);

            let initial = match file {
                Some(path) => {
                    let bytes = tokio::fs::read(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    RunState::with_source(bytes)
                }
                None => RunState::new(),
            };

            let plan = app.planner.plan(&task).await?;
            let output = app.executor.execute(&plan, initial).await?;

            let reply = serde_json::json!({
                "result": output.state.to_result_json(),
                "logs": output.log,
            });
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
    }
}
