mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    quake_logging::initialize(&quake_logging::LogSettings::default());
    app::run_app()
}
