//! Session Gate - Entry Point

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use session_gate::{config, config::Config, server};

#[derive(Parser, Debug)]
#[command(name = "session-gate")]
#[command(about = "Google sign-in server with signed-cookie sessions")]
#[command(version)]
struct Cli {
    /// Google OAuth client ID
    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// Google OAuth client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Current cookie signing key (new cookies are signed with it)
    #[arg(long, env = "COOKIE_KEY_1", hide_env_values = true)]
    cookie_key_1: Option<String>,

    /// Previous cookie signing key (still accepted for existing cookies)
    #[arg(long, env = "COOKIE_KEY_2", hide_env_values = true)]
    cookie_key_2: Option<String>,

    /// HTTP server port
    #[arg(long, default_value_t = config::DEFAULT_PORT, env = "PORT")]
    port: u16,

    /// Externally visible base URL, used to build the OAuth callback URL
    #[arg(long, default_value = config::DEFAULT_PUBLIC_URL, env = "PUBLIC_URL")]
    public_url: String,

    /// Directory containing index.html
    #[arg(long, default_value = config::DEFAULT_PUBLIC_DIR, env = "PUBLIC_DIR")]
    public_dir: PathBuf,

    /// Mark the session cookie Secure (turn off only for plain-HTTP development)
    #[arg(long, default_value_t = true, env = "SECURE_COOKIES", action = clap::ArgAction::Set)]
    secure_cookies: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting session-gate");

    // Missing credentials stop the process here, before the listener binds.
    let config = Config::new(cli.client_id, cli.client_secret, cli.cookie_key_1, cli.cookie_key_2)
        .and_then(|c| c.with_public_url(&cli.public_url))
        .inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?
        .with_port(cli.port)
        .with_public_dir(cli.public_dir)
        .with_secure_cookies(cli.secure_cookies);

    tracing::info!(config = ?config, "Configuration loaded");

    server::serve(config).await
}
