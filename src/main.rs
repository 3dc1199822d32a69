//! dstore - refresh document stores and monitor them until they settle.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let default_filter = if cli::is_verbose() {
        "docstore_refresher=debug,dstore=debug"
    } else {
        "docstore_refresher=warn,dstore=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(cli::LogWriter))
        .init();

    tokio::select! {
        result = cli::run() => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nOperation cancelled by user");
            // A prompt may still be blocked on stdin.
            std::process::exit(0);
        }
    }
}
