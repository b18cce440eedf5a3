//! Owning layer: wires the coordinator, asks for the most recent quake and
//! shows it. Asks twice; the second answer comes from the cache.

use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use quake_engine::{ChannelListener, CoordinatorConfig, FetchSettings, QuakeFetcher, QuakeReport};
use quake_logging::{quake_info, quake_warn};

const REPORT_TIMEOUT: Duration = Duration::from_secs(60);

pub fn run_app() -> ExitCode {
    let coordinator =
        QuakeFetcher::from_settings(FetchSettings::default(), CoordinatorConfig::default());

    let mut failed = false;
    for attempt in 1..=2 {
        match fetch_location(&coordinator) {
            Some(location) => {
                quake_info!("Attempt {} answered from {:?}", attempt, coordinator.phase());
                println!("Most recent quake: {location}");
            }
            None => {
                println!("Could not fetch the most recent quake");
                failed = true;
                break;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Reports arrive on the coordinator's worker; they are received back here on
/// the calling thread.
fn fetch_location(coordinator: &QuakeFetcher) -> Option<String> {
    let (tx, rx) = mpsc::channel();
    coordinator.request(ChannelListener::new(tx));

    match rx.recv_timeout(REPORT_TIMEOUT) {
        Ok(QuakeReport::Success(location)) => Some(location),
        Ok(QuakeReport::Failure) => {
            quake_warn!("Fetch failed: {:?}", coordinator.last_failure());
            None
        }
        Err(err) => {
            quake_warn!("No report received: {}", err);
            None
        }
    }
}
