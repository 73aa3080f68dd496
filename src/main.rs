//! CardioScan: heart disease risk assessment form.
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardioscan::adapters::sanitize::RedactingMakeWriter;
use cardioscan::application::ArtifactAssessmentService;
use cardioscan::config::AppConfig;
use cardioscan::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Logging to the terminal would corrupt the TUI, so interactive runs log
    // to a file unless told otherwise.
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log_mode.uses_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: a missing directory surfaces as an open error below.
            let _ = std::fs::create_dir_all(parent);
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting CardioScan...");

    // Refuse to accept input without usable artifacts.
    let service = match ArtifactAssessmentService::open(&config.artifact_dir, config.load_options()) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Startup aborted: {}", e);
            return Err(e).with_context(|| {
                format!(
                    "Cannot start without model artifacts in {:?} (set CARDIOSCAN_ARTIFACT_DIR)",
                    config.artifact_dir
                )
            });
        }
    };

    let mut app = App::new(service);
    app.run()?;

    tracing::info!("CardioScan shutdown complete.");
    Ok(())
}
