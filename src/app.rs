/*
 * Responsibility
 * - Reference service wiring for the toolkit:
 *   tracing -> Config -> token codec + remote authorizer -> Router -> serve
 * - HTTP-level middleware (request id, tracing, limits) around everything
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_auth::{
    api,
    config::{Config, ConfigError},
    middleware::http::{self, HttpPolicy},
    services::{auth::build_token_codec, permission::RemotePermissionClient},
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,service_auth=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let codec = build_token_codec(config).context("failed to build token codec")?;

    let remote = config
        .remote_permission_config()
        .ok_or(ConfigError::Missing("PERMISSION_ENDPOINT_URL"))?;
    tracing::info!(endpoint = %remote.endpoint, timeout = ?remote.timeout, "using remote permission service");
    let authorizer = Arc::new(RemotePermissionClient::new(remote)?);

    Ok(AppState::new(codec, authorizer))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    http::apply(
        router,
        HttpPolicy {
            timeout: Duration::from_secs(config.http_timeout_seconds),
            ..HttpPolicy::default()
        },
    )
}
