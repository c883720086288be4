mod app;
mod gameplay;

use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    match app::bootstrap::build_app() {
        Ok(app) => app::loop_runner::run(app),
        Err(err) => {
            error!(error = %err, "config_failed");
            ExitCode::FAILURE
        }
    }
}
