mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use audit::AuditStore;
use catalog::ToolRegistry;
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use gateway::{handlers, ExecutionRequest, Gateway};
use oracle::OracleClient;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "warden.toml";

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "A policy-checked tool execution gateway", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tools
    Tools {
        /// Filter by category
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
    /// Execute a tool through the authorization pipeline
    Exec {
        /// Tool name
        #[arg(short, long)]
        tool: String,
        /// Arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
        /// Requesting identity
        #[arg(short, long)]
        user: Option<String>,
        /// Correlation id (generated if absent)
        #[arg(long)]
        trace: Option<String>,
    },
    /// Show the execution audit trail
    Audit {
        /// Filter by trace id
        #[arg(long)]
        trace: Option<String>,
        /// Show only the last N records
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WARDEN_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Tools { category } => cmd_tools(&config, category.as_deref()).await,
        Commands::Exec {
            tool,
            args,
            user,
            trace,
        } => cmd_exec(&config, &tool, args.as_deref(), user, trace).await,
        Commands::Audit { trace, limit } => cmd_audit(&config, trace.as_deref(), limit),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(p) => Ok(Config::load(p)?),
        None if std::path::Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}

async fn build_registry(config: &Config) -> Result<Arc<ToolRegistry>> {
    let registry = Arc::new(ToolRegistry::new());
    handlers::register_builtins(&registry).await?;
    registry.set_mode(config.gateway.permission_mode).await;
    Ok(registry)
}

async fn cmd_tools(config: &Config, category: Option<&str>) -> Result<()> {
    let registry = build_registry(config).await?;
    let names = registry.list(category).await;

    if names.is_empty() {
        println!("No tools registered.");
        return Ok(());
    }

    println!("{:<14}  {:<8}  {:<12}  DESCRIPTION", "NAME", "TIER", "CATEGORY");
    println!("{}", "-".repeat(72));
    for name in names {
        if let Some(def) = registry.get(&name).await {
            println!(
                "{:<14}  {:<8}  {:<12}  {}",
                def.name,
                def.tier.to_string(),
                def.category,
                def.description
            );
        }
    }

    Ok(())
}

async fn cmd_exec(
    config: &Config,
    tool: &str,
    args: Option<&str>,
    user: Option<String>,
    trace: Option<String>,
) -> Result<()> {
    let registry = build_registry(config).await?;

    let oracle = if config.oracle.enabled {
        OracleClient::new(config.oracle.url.clone())
    } else {
        OracleClient::disabled()
    };

    let store = Arc::new(AuditStore::open(&config.gateway.audit_db)?);
    let gw = Gateway::new(registry, oracle).with_audit(store);

    let arguments: Map<String, Value> = match args {
        Some(json) => serde_json::from_str(json).map_err(|e| Error::InvalidArgs(e.to_string()))?,
        None => Map::new(),
    };

    let mut request = ExecutionRequest::new(tool).with_arguments(arguments);
    if let Some(user) = user {
        request = request.with_user(user);
    }
    if let Some(trace) = trace {
        request = request.with_trace_id(trace);
    }

    let result = gw.execute(request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.success {
        Ok(())
    } else {
        Err(Error::ExecutionFailed {
            decision: result.decision.to_string(),
        })
    }
}

fn cmd_audit(config: &Config, trace: Option<&str>, limit: usize) -> Result<()> {
    let path = &config.gateway.audit_db;
    if !path.exists() {
        return Err(Error::DatabaseNotFound { path: path.clone() });
    }

    let store = AuditStore::open(path)?;
    let records = match trace {
        Some(t) => store.by_trace(t)?,
        None => store.recent(limit)?,
    };

    if records.is_empty() {
        println!("No audit records found.");
        return Ok(());
    }

    println!(
        "{:<20}  {:<36}  {:<12}  {:<8}  DETAIL",
        "TIME", "TRACE", "TOOL", "DECISION"
    );
    println!("{}", "-".repeat(100));
    for record in records {
        let time = Local
            .from_utc_datetime(&record.timestamp.naive_utc())
            .format("%Y-%m-%d %H:%M:%S");
        println!(
            "{:<20}  {:<36}  {:<12}  {:<8}  {}",
            time.to_string(),
            record.trace_id,
            record.tool,
            record.decision,
            record.detail.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
