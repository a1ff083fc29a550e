/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - tenant directory (プロセスで一つ) と sweep 停止用 token の所有
 * - axum::serve() で起動 (graceful shutdown 付き)
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware;
use crate::repos::{PgMembershipStore, PgTenantRegistry, PgUserRepository};
use crate::services::auth::build_token_service;
use crate::services::tenant::TenantDirectorySlot;
use crate::state::AppState;

static TENANT_DIRECTORY: TenantDirectorySlot = TenantDirectorySlot::new();

fn init_tracing() {
    // RUST_LOG があればそれを優先。例:
    // RUST_LOG=info,tenant_gate=debug,tower_http=debug cargo run
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

        // 開発中は即 abort、本番は default hook に任せてサーバは止めない
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
        "starting tenant-gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let shutdown = CancellationToken::new();
    let state = build_state(&config, &shutdown).await?;
    let app = build_router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: &Config, shutdown: &CancellationToken) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.external_call_timeout)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    let tokens = build_token_service(config)?;
    let directory = TENANT_DIRECTORY.get_or_init(
        config.tenant_cache_ttl,
        config.tenant_cache_sweep_interval,
        shutdown,
    );

    let state = AppState::new(
        tokens,
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgTenantRegistry::new(pool.clone())),
        Arc::new(PgMembershipStore::new(pool)),
        directory,
    )
    .with_tenant_sources(config.tenant_sources.clone())
    .with_call_timeout(config.external_call_timeout);

    Ok(state)
}

/// Full HTTP surface: liveness, the guarded v1 API and the HTTP-level middleware.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, request_timeout)
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
        }
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
