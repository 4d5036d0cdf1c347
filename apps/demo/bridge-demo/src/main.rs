use bridge_demo::demo::{self, DemoSummary};
use bridge_demo::error::DemoError;
use bridge_demo::logger;

use bridge_core::config::BridgeConfig;

use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

const LOG_DIR_NAME: &str = "bridge-demo";

/// Usage: `bridge-demo [config-dir]`. Without a directory the defaults apply.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to render summary: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{e}");
            eprintln!(
                "{}",
                serde_json::to_string(&e).unwrap_or_else(|_| e.to_string())
            );
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<DemoSummary, DemoError> {
    let log_dir = std::env::temp_dir().join(LOG_DIR_NAME);
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| DemoError::demo(format!("Failed to create log dir: {e}")))?;
    logger::initialize(&log_dir)?;

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(config_dir) => {
            info!("Loading config from {}", config_dir.display());
            BridgeConfig::load(&config_dir).map_err(|e| DemoError::Config {
                message: e.to_string(),
                location: common::ErrorLocation::from(std::panic::Location::caller()),
            })?
        }
        None => BridgeConfig::default(),
    };

    let handshake = demo::run_handshake(&config)?;
    let request = demo::run_request(&config).await?;

    Ok(DemoSummary { handshake, request })
}
