/*
 * Responsibility
 * - Load Config -> build dependencies -> assemble the Router
 * - Apply HTTP middleware
 * - Start with axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::{
    DecisionService,
    access::{RemoteAccessEvaluator, ReqwestTransport},
    claims::{DefaultClaimMapper, ReleaseEngine, StaticSupportedClaims},
    registry::InMemoryServiceRegistry,
};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,claimgate=debug,tower_http=debug cargo run
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

        // Development: crash the whole process so it gets noticed.
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
        "starting decision API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, config.http_request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Wire collaborators by hand; nothing is looked up at call time.
pub fn build_state(config: &Config) -> Result<AppState> {
    let registry = InMemoryServiceRegistry::load(&config.service_registry_path)?;
    tracing::info!(
        services = registry.len(),
        path = %config.service_registry_path.display(),
        "loaded service registry"
    );

    let release = ReleaseEngine::new(
        Arc::new(DefaultClaimMapper::new(config.claims_map.clone())),
        Arc::new(StaticSupportedClaims::new(config.supported_claims.clone())),
    );

    let transport = ReqwestTransport::new(config.remote_access_timeout)?;
    let access = RemoteAccessEvaluator::new(Arc::new(transport));

    let decisions = DecisionService::new(
        Arc::new(registry),
        release,
        access,
        config.remote_access_failure_mode,
    );

    Ok(AppState::new(decisions))
}

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    middleware::http::apply(router, request_timeout)
}
