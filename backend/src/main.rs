//! Gateway entry-point: reads configuration and runs the HTTP server.

use std::io;

use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use session_gateway::config::GatewaySettings;
use session_gateway::inbound::http::session_config::{BuildMode, session_settings_from_env};
use session_gateway::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        GatewaySettings::load_from_iter(std::env::args_os()).map_err(io::Error::other)?;
    let session = session_settings_from_env(
        &mockable::DefaultEnv::new(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(io::Error::other)?;

    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let directory_url = settings.directory_url().map_err(io::Error::other)?;
    let session_ttl = settings.session_ttl().map_err(io::Error::other)?;
    let config = ServerConfig::new(session, bind_addr, directory_url, settings.session_dir())
        .with_directory_timeout(settings.directory_timeout())
        .with_session_ttl(session_ttl)
        .with_reap_interval(settings.reap_interval());

    create_server(config)?.await
}
