use log::LevelFilter;
use quake_logging::{initialize, initialize_for_tests, LogDestination, LogSettings};

#[test]
fn defaults_log_info_to_terminal_and_file() {
    let settings = LogSettings::default();
    assert_eq!(settings.destination, LogDestination::Both);
    assert_eq!(settings.level, LevelFilter::Info);
    assert_eq!(settings.file.to_str(), Some(quake_logging::LOG_FILE));
}

#[test]
fn second_initialization_is_refused_without_panicking() {
    initialize_for_tests();
    initialize_for_tests();

    let settings = LogSettings {
        destination: LogDestination::Terminal,
        ..LogSettings::default()
    };
    assert!(!initialize(&settings));
    quake_logging::quake_trace!("still logging after a refused init");
}
