//! Academic Calendar Entry Point

use academic_calendar::config::TransportType;
use academic_calendar::{run_rest_server, run_server, CalendarMcpServer, Config};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Academic Calendar: event scheduling REST API and MCP server
#[derive(Parser, Debug)]
#[command(name = "academic-calendar")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Base URL of a running calendar REST API (overrides mcp.api_base_url)
    #[arg(short, long, global = true)]
    remote: Option<String>,

    /// Run client commands directly against the configured store
    #[arg(short, long, global = true, conflicts_with = "remote")]
    local: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the REST API server
    Serve {
        /// Bind host. If not specified, uses config file value.
        #[arg(long)]
        host: Option<String>,
        /// Bind port. If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },

    /// Run the MCP server
    Mcp {
        /// Transport type. If not specified, uses config file value.
        #[arg(short, long, value_enum)]
        transport: Option<TransportType>,
        /// HTTP port (when using http transport). If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Base URL of the calendar REST API
        #[arg(long)]
        api_url: Option<String>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },

    /// Create the database and events table if missing
    InitDb,

    /// Manage calendar events
    Events {
        #[command(subcommand)]
        action: EventsCommand,
    },

    /// Events starting within the next days
    Upcoming {
        /// Number of days to look ahead (1-30)
        #[arg(short, long, default_value = "7")]
        days: i64,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Events starting on a date
    OnDate {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Search events by name or description
    Search {
        /// Search query
        query: String,
    },

    /// Show calendar statistics
    Stats {
        /// Period label: week, month, semester
        #[arg(short, long, default_value = "month")]
        period: String,
    },
}

/// Event management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum EventsCommand {
    /// List events
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Filter by status: not_started, in_progress, completed
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one event
    Get {
        /// Event ID
        id: String,
    },

    /// Create an event
    Create {
        /// Event ID (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Event name
        #[arg(short, long)]
        name: String,
        /// Event description
        #[arg(long)]
        content: Option<String>,
        /// Category (case-insensitive): Lecture, Lab, Meeting, "Office Hours",
        /// Assignment, Defense, Workshop, "Study Group", Seminar, Grading, Advising
        #[arg(long)]
        category: String,
        /// Priority level (1=Low, 2=Medium, 3=High)
        #[arg(long, default_value = "1")]
        level: i64,
        /// Start time (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        start: String,
        /// End time (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        end: String,
    },

    /// Update an event; omitted fields keep their stored value
    Update {
        /// Event ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        level: Option<i64>,
        /// Completion status (0.0 to 1.0)
        #[arg(short, long)]
        status: Option<f64>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    config.apply_env();

    let mode = if args.local {
        cli::ExecutionMode::Local(Box::new(config.clone()))
    } else {
        let mut remote = config.clone();
        if let Some(url) = &args.remote {
            remote.mcp.api_base_url = url.clone();
        }
        cli::ExecutionMode::Remote(Box::new(remote))
    };

    // For CLI commands (non-server), use minimal logging
    let is_server = matches!(args.command, Command::Serve { .. } | Command::Mcp { .. });
    if !is_server {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    match args.command {
        Command::Serve {
            host,
            port,
            json_logs,
        } => run_rest(config, host, port, json_logs).await,
        Command::Mcp {
            transport,
            port,
            api_url,
            json_logs,
        } => run_mcp_server(config, transport, port, api_url.or(args.remote), json_logs).await,
        Command::InitDb => cli::run_init_db(&config, args.json).await,
        Command::Events { action } => cli::run_events(mode, action, args.json).await,
        Command::Upcoming { days, category } => {
            cli::run_upcoming(mode, days, category, args.json).await
        }
        Command::OnDate { date } => cli::run_on_date(mode, date, args.json).await,
        Command::Search { query } => cli::run_search(mode, query, args.json).await,
        Command::Stats { period } => cli::run_stats(mode, period, args.json).await,
    }
}

/// Initialize tracing for server mode.
///
/// Stdio MCP sessions own stdout, so logs go to stderr there.
fn init_server_logging(json_logs: bool, to_stderr: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (json_logs, to_stderr) {
        (true, true) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        (true, false) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        (false, true) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        (false, false) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

/// Run the REST API server.
async fn run_rest(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    json_logs: bool,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    init_server_logging(json_logs, false);

    tracing::info!("Starting calendar REST API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        storage_backend = ?config.storage.backend,
        table = %config.storage.table_name,
        "Configuration loaded"
    );

    run_rest_server(config).await
}

/// Run the MCP server against the configured REST API.
async fn run_mcp_server(
    mut config: Config,
    transport: Option<TransportType>,
    port: Option<u16>,
    api_url: Option<String>,
    json_logs: bool,
) -> anyhow::Result<()> {
    // Override transport from CLI args only if explicitly provided
    if let Some(t) = transport {
        config.mcp.transport = t;
    }
    if let Some(p) = port {
        config.mcp.http_port = p;
    }
    if let Some(url) = api_url {
        config.mcp.api_base_url = url;
    }

    init_server_logging(json_logs, config.mcp.transport == TransportType::Stdio);

    tracing::info!("Starting calendar MCP server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        transport = ?config.mcp.transport,
        api_base_url = %config.mcp.api_base_url,
        "Configuration loaded"
    );

    let server = CalendarMcpServer::from_config(&config)?;
    run_server(server, config.mcp.transport, config.mcp.http_port).await?;

    Ok(())
}
