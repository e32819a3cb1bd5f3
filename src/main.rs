//! Visual Review server entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;
use visual_review::{AppState, GatewayError, VisualReviewConfig, router};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), GatewayError> {
    let config = load_config()?;
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .map_err(|error| GatewayError::Io {
            message: format!("bind {addr}: {error}", addr = config.bind_addr()),
        })?;
    info!(addr = config.bind_addr(), "visual review server listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| GatewayError::Io {
            message: error.to_string(),
        })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<VisualReviewConfig, GatewayError> {
    VisualReviewConfig::load().map_err(|error| GatewayError::Configuration {
        message: error.to_string(),
    })
}
