//! CLI parser and dispatch.

mod list;
mod refresh;
mod select;
mod summary;

use clap::{Parser, Subcommand};
use tracing::debug;

use docstore_refresher::config::{RawSettings, Settings, DEBUG_VAR, DEFAULT_REQUEST_TIMEOUT_SECS};
use docstore_refresher::refresh::{DEFAULT_MAX_REFRESH_SECS, DEFAULT_POLL_INTERVAL_SECS};
use docstore_refresher::selection::SelectionCriteria;

#[derive(Parser)]
#[command(name = "dstore")]
#[command(about = "Refresh document stores and monitor them until they settle")]
#[command(version)]
pub struct Cli {
    /// Base URL of the document store service
    #[arg(long, env = "FLOWISE_BASE_URL", global = true)]
    base_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "FLOWISE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Seconds between status checks
    #[arg(long, env = "STATUS_CHECK_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL_SECS, global = true)]
    interval: u64,

    /// Maximum seconds to monitor a single store
    #[arg(long, env = "MAX_REFRESH_TIMEOUT", default_value_t = DEFAULT_MAX_REFRESH_SECS, global = true)]
    timeout: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, global = true)]
    request_timeout: u64,

    /// Show every refresh request attempt (also DEBUG=true)
    #[arg(long, global = true)]
    debug: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn raw_settings(&self) -> RawSettings {
        RawSettings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            poll_interval_secs: self.interval,
            max_refresh_secs: self.timeout,
            request_timeout_secs: self.request_timeout,
            debug: debug_requested(self.debug, env_debug().as_deref()),
        }
    }
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    let debug_flag = std::env::args().any(|arg| arg == "--debug");
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
        || debug_requested(debug_flag, env_debug().as_deref())
}

fn env_debug() -> Option<String> {
    std::env::var(DEBUG_VAR).ok()
}

/// Debug mode is on with `--debug` or a truthy `DEBUG` value.
fn debug_requested(flag: bool, env_value: Option<&str>) -> bool {
    flag || env_value.map(is_truthy).unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Subcommand)]
enum Commands {
    /// List every document store with full details
    List,

    /// Choose stores from a menu, then refresh and monitor them
    Select,

    /// Refresh stores chosen by id or name, then monitor them
    Refresh {
        /// Store id or id prefix (repeatable)
        #[arg(long = "id", value_name = "STORE_ID")]
        ids: Vec<String>,
        /// Case-insensitive name substring (repeatable)
        #[arg(long = "name", value_name = "NAME")]
        names: Vec<String>,
        /// Refresh every refreshable store
        #[arg(short, long)]
        all: bool,
        /// Only list stores and exit
        #[arg(short, long)]
        list: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::new(cli.raw_settings())?;
    debug!(?settings, "Loaded settings");
    let client = settings.client()?;

    match cli.command {
        Commands::List => list::cmd_list(&settings, &client).await,
        Commands::Select => select::cmd_select(&settings, &client).await,
        Commands::Refresh {
            ids,
            names,
            all,
            list,
        } => {
            let criteria = SelectionCriteria { ids, names, all };
            refresh::cmd_refresh(&settings, &client, criteria, list).await
        }
    }
}
