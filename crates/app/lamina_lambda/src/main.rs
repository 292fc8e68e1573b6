//! Lamina AWS Lambda handler.
//!
//! Built as `bootstrap` for the `provided.al2023` runtime. `lambda_http`
//! translates API Gateway and ALB events into requests for the shared router.
//! State, including the JWKS cache, is built once per cold start.

use lamina_api::{AppState, config::ApiConfig};
use lambda_http::{Error, run};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch stamps each line, so no timestamps and no ANSI colors.
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lamina_api=debug,lamina_core=debug".into()),
        )
        .with_ansi(false)
        .without_time()
        .init();

    let config = ApiConfig::from_env();
    info!(
        auth = config.auth_enabled(),
        origins = ?config.allowed_origins,
        "starting lamina_lambda"
    );

    let state = AppState::from_config(config)?;
    run(lamina_api::router(state)).await
}
