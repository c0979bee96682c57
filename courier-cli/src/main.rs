//! Courier CLI - Command-line interface for the Courier messaging client.
//!
//! Drives the client data layer headlessly: account registration and login,
//! conversation and contact sync, and paging through the local conversation
//! list. Useful for scripting, debugging, and running the client on machines
//! without the desktop shell.

mod commands;

use clap::{Parser, Subcommand};
use tracing::info;

use courier_core::config::{AppConfig, ConfigHandle};
use courier_core::error::CourierResult;
use courier_core::logging;
use courier_core::platform::Platform;

/// Courier - messaging client for the terminal.
#[derive(Parser)]
#[command(
    name = "courier",
    version,
    about = "Courier messaging client CLI",
    long_about = "A command-line interface for the Courier messaging client.\n\
                   Log in to a Courier backend to sync and browse conversations and contacts."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account (activation code flow).
    Register {
        /// Display name for the new account.
        #[arg(short, long)]
        name: String,
        /// Email address to register.
        #[arg(short, long)]
        email: String,
    },
    /// Log in and store the session.
    Login {
        /// Email address.
        #[arg(short, long)]
        email: String,
        /// Password. Prompted interactively when omitted.
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and drop the current session.
    Logout,
    /// Show backend, session, and database status.
    Status,
    /// Sync conversations (and contacts) from the backend.
    Sync {
        /// Also sync contacts regardless of configuration.
        #[arg(long)]
        contacts: bool,
        /// Re-fetch everything instead of continuing after the stored cursor.
        #[arg(long)]
        full: bool,
    },
    /// Page through the local conversation list.
    List {
        /// Page size for the list windows.
        #[arg(short = 'n', long)]
        page_size: Option<i64>,
        /// Include the self-conversation.
        #[arg(long)]
        all: bool,
    },
    /// List and sync contacts.
    Contacts {
        #[command(subcommand)]
        action: commands::contacts::ContactsAction,
    },
    /// Database management commands.
    Db {
        #[command(subcommand)]
        action: commands::db::DbAction,
    },
}

#[tokio::main]
async fn main() -> CourierResult<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let log_dir = Platform::data_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("logs");
    let _guard = logging::init_logging(log_level, &log_dir, false)?;

    // Load configuration
    let config_path = cli.config.as_deref().map(std::path::Path::new);
    let config = if let Some(path) = config_path {
        AppConfig::load_from_file(path)?
    } else {
        AppConfig::load_default()?
    };

    let config_handle = ConfigHandle::new(config);

    info!("Courier CLI v{}", courier_core::constants::APP_VERSION);

    // Dispatch to command handlers
    match cli.command {
        Commands::Register { name, email } => {
            commands::auth::register(config_handle, name, email).await
        }
        Commands::Login { email, password } => {
            commands::auth::login(config_handle, email, password).await
        }
        Commands::Logout => {
            commands::auth::logout(config_handle).await
        }
        Commands::Status => {
            commands::status::run(config_handle, cli.format).await
        }
        Commands::Sync { contacts, full } => {
            commands::sync::run(config_handle, contacts, full).await
        }
        Commands::List { page_size, all } => {
            commands::list::run(config_handle, page_size, all, cli.format).await
        }
        Commands::Contacts { action } => {
            commands::contacts::run(config_handle, action, cli.format).await
        }
        Commands::Db { action } => {
            commands::db::run(config_handle, action, cli.format).await
        }
    }
}
