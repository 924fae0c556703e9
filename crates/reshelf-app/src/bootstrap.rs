use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use reshelf_acquire::{Acquirer, HttpAcquirer};
use reshelf_api::{ApiServer, ApiState};
use reshelf_config::{LogFormatChoice, ServerConfig};
use reshelf_fsops::FsOpsService;
use reshelf_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};

/// Services wired from a validated configuration.
pub(crate) struct BootstrapDependencies {
    addr: SocketAddr,
    fsops: FsOpsService,
    acquirer: Arc<dyn Acquirer>,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Build every service the API needs from `config`.
    pub(crate) fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        let fsops = FsOpsService::new(telemetry.clone())
            .with_allow_paths(config.allow_paths.iter().cloned())
            .with_force_preview(config.force_preview);
        let acquirer = HttpAcquirer::new(&config.acquire, telemetry.clone())
            .map_err(|err| AppError::acquire("acquire.client", err))?;

        if config.allow_paths.is_empty() {
            warn!("no allow-list configured; filesystem operations may touch any absolute path");
        }
        if config.force_preview {
            info!("force_preview enabled; mutating filesystem requests only report");
        }

        Ok(Self {
            addr: config.socket_addr(),
            fsops,
            acquirer: Arc::new(acquirer),
            telemetry,
        })
    }
}

/// Entry point for the Reshelf boot sequence.
///
/// Loads configuration from the environment, installs logging, and serves
/// the API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if configuration, telemetry, or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let config =
        ServerConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
    reshelf_telemetry::init_logging(&logging_config(&config))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("server");

    info!("Reshelf bootstrap starting");
    let dependencies = BootstrapDependencies::from_config(&config)?;
    run_app_with(dependencies, shutdown_signal()).await
}

/// Serve with injected dependencies until `shutdown` resolves.
pub(crate) async fn run_app_with<F>(
    dependencies: BootstrapDependencies,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let BootstrapDependencies {
        addr,
        fsops,
        acquirer,
        telemetry,
    } = dependencies;

    let api = ApiServer::new(ApiState::new(fsops, acquirer, telemetry));
    info!(addr = %addr, "Launching API listener");
    api.serve(addr, shutdown)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn logging_config(config: &ServerConfig) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &config.log_level,
        format: log_format(config.log_format),
        build_sha: &config.build_sha,
    }
}

const fn log_format(choice: Option<LogFormatChoice>) -> LogFormat {
    match choice {
        Some(LogFormatChoice::Json) => LogFormat::Json,
        Some(LogFormatChoice::Pretty) => LogFormat::Pretty,
        None => LogFormat::infer(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
