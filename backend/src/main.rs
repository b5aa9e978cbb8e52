//! Backend entry-point: loads settings, applies migrations and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodgram::inbound::http::health::HealthState;
use foodgram::outbound::media::CapStdImageStore;
use foodgram::outbound::persistence::{DbPool, run_pending_migrations};

use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr()?;
    let pool_config = settings.pool_config()?;

    let applied = run_pending_migrations(pool_config.database_url())
        .await
        .wrap_err("failed to apply migrations")?;
    info!(applied, "database schema is current");

    let db_pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")?;
    let media_root = settings.media_root();
    let images = CapStdImageStore::open(&media_root, settings.media_url())
        .wrap_err_with(|| format!("failed to open media root {}", media_root.display()))?;

    let config = ServerConfig::new(bind_addr, db_pool, images)
        .with_recipe_settings(settings.recipe_settings())
        .with_page_limits(settings.page_limits());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &config)?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received, draining");
        health_state.begin_draining();
        handle.stop(true).await;
    });
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
