use std::path::PathBuf;
use std::process;

use clap::Parser;
use gisans_config::{load_config, Config};
use gisans_server::run_server;
use log::{error, info, warn};

/// Event-exchange server: simulates scattering for neutron events sent by
/// a transport simulation over a line-oriented socket protocol.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Interface to listen on (overrides the config file)
    #[arg(short, long)]
    interface: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

// Single-threaded runtime on purpose: all handlers are cooperative, heavy
// computation lives in the per-connection worker threads.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = match load_config(&args.config) {
        Ok(config) => {
            info!("using configuration from {}", args.config.display());
            config
        }
        Err(err) => {
            warn!(
                "could not load {} ({err}), using defaults",
                args.config.display()
            );
            Config::default()
        }
    };
    if let Some(interface) = args.interface {
        config.server.interface = interface;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Err(err) = run_server(config).await {
        error!("server failed: {err}");
        process::exit(1);
    }
}
