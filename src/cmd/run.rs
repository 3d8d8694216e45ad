//! `waypoint run`: start the proxy server.
//!
//! Loads the configuration once, registers every rule with the router,
//! binds a single listener and serves until SIGTERM or Ctrl+C. Any
//! failure before the listener is bound is fatal.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::{sources, ConfigSource};
use crate::error::WaypointError;
use crate::logging;
use crate::proxy::routing::RouteTable;
use crate::server::{self, AppState};

/// Config files looked up in the working directory when `--config` is absent.
pub const CONFIG_CANDIDATES: &[&str] = &[
    "config.yaml",
    "config.yml",
    "waypoint.yaml",
    "waypoint.yml",
    "waypoint.json",
    "waypoint.toml",
];

pub async fn execute(args: RunArgs) -> Result<(), WaypointError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let source = resolve_config_source(args.config.as_deref()).await?;
    let config = source.load().await?;

    let table = RouteTable::new(config.routes);
    if table.is_empty() {
        tracing::warn!("no routes configured, every request will get 404");
    }
    let state = Arc::new(AppState::new(&config.client));
    let router = server::build_router(state, &table)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        routes = table.len(),
        source = source.name(),
        "waypoint started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("waypoint stopped");
    Ok(())
}

async fn resolve_config_source(
    explicit: Option<&Path>,
) -> Result<Box<dyn ConfigSource>, WaypointError> {
    if let Some(path) = explicit {
        return sources::for_path(path);
    }

    for name in CONFIG_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return sources::for_path(&path);
        }
    }

    Err(WaypointError::NoConfigSource {
        hint: "Provide --config <file> or create ./config.yaml.\n  \
               Run 'waypoint init' to create a config file."
            .into(),
    })
}
