//! Listener setup and the accept loop.

use gisans_config::{Config, ServerSettings};
use log::{info, warn};
use tokio::net::TcpListener;

use crate::handler::handle_client;
use crate::ServerError;

/// Binds the configured interface and serves connections forever.
pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let addr = format!("{}:{}", config.server.interface, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    serve(listener, config.server).await
}

/// Accept loop over an already-bound listener. One handler task per
/// connection; all handlers share the cooperative scheduler while each
/// owns its private worker thread.
pub async fn serve(listener: TcpListener, settings: ServerSettings) -> Result<(), ServerError> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let settings = settings.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_client(stream, settings).await {
                warn!("connection {peer} failed: {err}");
            }
        });
    }
}
