use std::path::PathBuf;
use std::process;

use clap::Parser;
use gisans_batch::{
    propagate_to_surface, read_event_file, write_event_file, BatchContext, BatchError,
};
use gisans_config::{load_config, Config};
use log::{error, info, warn};

/// Offline event-exchange: reads a neutron event file, scatters every event
/// off the configured sample model and writes the outgoing events back out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input event file
    input: PathBuf,

    /// Output event file
    output: PathBuf,

    /// Sample model name
    #[arg(short, long, default_value = "hexagonal_spheres")]
    model: String,

    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match load_config(&args.config) {
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

    if let Err(err) = run(&args, config) {
        error!("batch run failed: {err}");
        process::exit(1);
    }
}

fn run(args: &Args, config: Config) -> Result<(), BatchError> {
    let settings = config.batch;
    let (header, events) = read_event_file(&args.input)?;
    info!("read {} events from {}", events.len(), args.input.display());

    let offset = settings.surface_offset;
    let at_surface: Vec<_> = events
        .iter()
        .map(|event| propagate_to_surface(event, offset))
        .collect();

    let context = BatchContext::new(&args.model, settings)?;
    let outcome = context.run(&at_surface)?;
    info!(
        "writing {} events to {} ({} missed the sample)",
        outcome.events.len(),
        args.output.display(),
        outcome.misses
    );
    write_event_file(&args.output, &header, &outcome.events)?;
    Ok(())
}
