//! MC-Pay Webhook Server
//!
//! Usage:
//!   mc-pay-webhook --port 3000
//!
//! Environment:
//!   MC_WEBHOOK_SECRET - Shared HMAC secret (default: dev-secret-change-me, dev only)
//!   PORT - Listen port (default: 3000)
//!   BIND_ADDR - Listen address (default: 0.0.0.0)
//!   APP_ENV - development | production (default: development)
//!   LEDGER_CAP - Retained payments (default: 200)

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mc_pay_webhook::{
    config::DEFAULT_SECRET, router, AppState, Environment, PaymentLedger, WebhookConfig,
    LEDGER_CAP,
};

#[derive(Parser, Debug)]
#[command(name = "mc-pay-webhook")]
#[command(about = "Signed payment webhook with an in-memory balance ledger")]
struct Args {
    /// Shared secret used to verify X-Signature
    #[arg(long, env = "MC_WEBHOOK_SECRET", default_value = DEFAULT_SECRET, hide_env_values = true)]
    secret: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Listen address
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind_addr: IpAddr,

    /// Deployment environment
    #[arg(long, env = "APP_ENV", value_enum, default_value = "development")]
    app_env: Environment,

    /// Maximum number of retained payments
    #[arg(long, env = "LEDGER_CAP", default_value_t = LEDGER_CAP)]
    ledger_cap: usize,
}

impl From<Args> for WebhookConfig {
    fn from(args: Args) -> Self {
        Self {
            secret: args.secret,
            bind_addr: SocketAddr::new(args.bind_addr, args.port),
            environment: args.app_env,
            ledger_cap: args.ledger_cap,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Environment first so clap sees .env values
    load_env();
    init_tracing();

    let config = WebhookConfig::from(Args::parse());
    config.validate().context("Invalid configuration")?;

    info!(?config, "🚀 MC-Pay webhook starting");

    let ledger = Arc::new(PaymentLedger::with_capacity(config.ledger_cap));
    let state = AppState::new(ledger, config.secret.as_str());
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🎯 Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate's own .env when launched from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mc_pay_webhook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown signal received");
}
