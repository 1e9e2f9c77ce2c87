mod app;

use std::process::ExitCode;

use tracing::{error, info};

fn main() -> ExitCode {
    app::bootstrap::init_tracing();
    info!("=== Map View Demo ===");

    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
