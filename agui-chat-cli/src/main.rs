//! `agui-chat`: interactive terminal client for an AG-UI backend

use agui_chat_cli::{connect, run_cli, BackendSource};
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "agui-chat", version, about = "Chat with an AG-UI agent backend")]
struct Args {
    /// Backend base URL (overrides --config-url and the environment)
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Runtime config endpoint serving {"backendUrl": ...}
    #[arg(long, value_name = "URL", env = "AGUI_CONFIG_URL")]
    config_url: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Initialize logging on stderr, honouring RUST_LOG
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "agui_chat_cli={level},agui_chat_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let source = BackendSource {
        backend_url: args.backend_url,
        config_url: args.config_url,
    };
    let session = connect(&source).await?;
    run_cli(session).await?;
    Ok(())
}
