//! Course service HTTP server
//!
//! ```bash
//! course-server --config config/courses.yaml
//! course-server --migrate-only
//! COURSES__DATABASE__URL=postgres://localhost/courses course-server
//! ```

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::{AppConfig, LoggingConfig};
use course_service::CourseServiceModule;
use sea_orm::{ConnectOptions, Database};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[clap(name = "course-server")]
#[clap(about = "Courses, ordered modules and polymorphic content over HTTP")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// YAML configuration file
    #[clap(long, short)]
    config: Option<PathBuf>,

    /// Override `server.bind_addr`
    #[clap(long)]
    bind: Option<String>,

    /// Apply migrations and exit
    #[clap(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut cfg = AppConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        cfg.server.bind_addr = bind;
    }

    init_tracing(&cfg.logging);

    let mut opts = ConnectOptions::new(cfg.database.url.clone());
    opts.max_connections(cfg.database.max_connections)
        .sqlx_logging(false);
    let db = Arc::new(
        Database::connect(opts)
            .await
            .context("failed to connect to database")?,
    );

    let module = CourseServiceModule::new();
    module.migrate(&db).await?;
    if args.migrate_only {
        info!("Migrations applied, exiting");
        return Ok(());
    }

    module.init(cfg.courses, db).await?;

    let app = module
        .register_rest(axum::Router::new())?
        .layer(TimeoutLayer::new(cfg.server.request_timeout))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    info!(addr = %cfg.server.bind_addr, "Course server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Course server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let json = logging
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_target(true));
    let plain = (!logging.json).then(|| tracing_subscriber::fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received CTRL+C, shutting down gracefully");
}
