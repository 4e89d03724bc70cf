//! Issues a token configured through `JWT_*` environment variables and
//! prints it on stdout.

use anyhow::Context;
use jwt_token_builder::telemetry::{init_tracing, TelemetryConfig};
use jwt_token_builder::{issue, TokenConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing(&TelemetryConfig::from_env());

    let config = TokenConfig::from_env().context("Failed to load token configuration")?;
    let token = issue(&config).context("Failed to issue token")?;

    info!(
        algorithm = config.algorithm.as_deref().unwrap_or("HS256"),
        claims = config.claims.len(),
        "Issued token"
    );
    println!("{token}");

    Ok(())
}
