//! Live-chat terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Visitor widget against a local backend
//! livechat-tui --server ws://127.0.0.1:5000/socket
//!
//! # Agent dashboard, opening the conversation with customer 42
//! livechat-tui --role agent --customer 42 --name "Ada Lovelace"
//! ```
//!
//! Logs go to `--log-file` since the terminal is owned by the UI.

use std::{fs::File, sync::Arc};

use clap::{Parser, ValueEnum};
use livechat_app::{App, ClientConfig, Runtime};
use livechat_client::{SenderRole, SystemEnv};
use livechat_tui::TerminalDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Which side of the conversation this client plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Role {
    /// Customer-facing chat widget.
    Visitor,
    /// Support agent dashboard.
    Agent,
}

/// Live-chat terminal client
#[derive(Parser, Debug)]
#[command(name = "livechat-tui")]
#[command(about = "Terminal client for the customer-support live chat")]
#[command(version)]
struct Args {
    /// Client role
    #[arg(short, long, value_enum, default_value = "visitor")]
    role: Role,

    /// Chat channel URL
    #[arg(short, long, default_value = "ws://127.0.0.1:5000/socket")]
    server: String,

    /// Base URL of the HTTP API (customer details)
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    api: String,

    /// Agent: conversation to open at start-up
    #[arg(long)]
    session: Option<u64>,

    /// Agent: customer of that conversation, or to start a new chat with
    #[arg(long)]
    customer: Option<u64>,

    /// Agent: display name of that customer
    #[arg(long)]
    name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// File to write logs to
    #[arg(long, default_value = "livechat-tui.log")]
    log_file: String,
}

impl Args {
    fn config(&self) -> ClientConfig {
        ClientConfig {
            role: match self.role {
                Role::Visitor => SenderRole::Visitor,
                Role::Agent => SenderRole::Agent,
            },
            server_url: self.server.clone(),
            api_base: self.api.clone(),
            preselected_session: self.session,
            preselected_customer: self.customer,
            preselected_name: self.name.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.config();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let log_file = File::create(&args.log_file)?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(log_file)))
        .with(filter)
        .init();

    tracing::info!(role = %config.role, server = %config.server_url, "livechat client starting");

    let driver = TerminalDriver::new(&config)?;
    let app = App::new(config, SystemEnv::new());

    Ok(Runtime::new(driver, app).run().await?)
}
