use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_router::config::RouterConfig;
use transit_router::domain::to_datetime;
use transit_router::io::{LoadError, load_config, load_network, load_request};
use transit_router::search::RaptorService;

const USAGE: &str = "usage: transit-router <network.json> <request.json> [config.json]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if !(2..=3).contains(&args.len()) {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }

    match run(&args[0], &args[1], args.get(2).map(PathBuf::as_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(network: &Path, request: &Path, config: Option<&Path>) -> Result<(), LoadError> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    let (data, transfers) = load_network(network)?;
    let request = load_request(request, &data)?;
    info!(
        service_date = %data.service_date(),
        stops = data.number_of_stops(),
        "network ready"
    );

    let service = RaptorService::new(config, transfers);
    let result = service.route(&data, &request)?;

    if result.paths.is_empty() {
        println!("No journeys found.");
        return Ok(());
    }
    for (i, path) in result.paths.iter().enumerate() {
        match to_datetime(data.service_date(), path.start_time()) {
            Some(departs) => println!("{:>2}. [{departs}] {}", i + 1, path.describe(&data)),
            None => println!("{:>2}. {}", i + 1, path.describe(&data)),
        }
    }
    Ok(())
}
