/// Compare how the standard and targeting endpoints treat the configured token.
///
/// Development tool for chasing false-positive logouts on targeting calls.
///
/// Usage:
///   SWAP_TARGETING__API_TOKEN=... SWAP_TARGETING__USER_ID=... cargo run --bin targeting-auth-debug
///
/// Environment variables:
///   - AUTH_DEBUG_ROUNDS: Number of comparison rounds (default: 3)
///   - AUTH_DEBUG_INTERVAL_MS: Delay between rounds in milliseconds (default: 1000)
use anyhow::{Context, Result};
use chrono::Utc;
use std::env;
use std::time::Duration;
use swap_targeting::{diagnostics::AuthDiagnosticSession, telemetry, Config, SwapApiClient};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;
    telemetry::init_tracing(&config);

    let rounds: u32 = env::var("AUTH_DEBUG_ROUNDS")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .context("AUTH_DEBUG_ROUNDS must be a valid u32")?;
    let interval_ms: u64 = env::var("AUTH_DEBUG_INTERVAL_MS")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .context("AUTH_DEBUG_INTERVAL_MS must be a valid u64")?;

    let client = SwapApiClient::from_config(&config).context("Failed to create API client")?;
    let mut session = AuthDiagnosticSession::with_default_endpoints(client, config.user_id);
    if config.user_id.is_none() {
        warn!("SWAP_TARGETING__USER_ID not set; only the standard endpoint will be probed");
    }

    session.start(Utc::now())?;

    let token = session.inspect_token(Utc::now());
    info!(
        present = token.present,
        subject = ?token.subject,
        expires_at = ?token.expires_at,
        expired = token.expired,
        error = ?token.error,
        "Token inspected"
    );

    for round in 1..=rounds {
        let comparison = session.compare_endpoints(Utc::now()).await?;
        info!(
            round = round,
            inconsistent = comparison.inconsistent,
            "Comparison round finished"
        );
        if round < rounds {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }

    let report = session.stop(Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
