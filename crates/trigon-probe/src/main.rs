use std::process::ExitCode;

use anyhow::Context;
use trigon_engine::logging::{init_logging, LoggingConfig};
use trigon_engine::{render_to_file, RenderConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run(RenderConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}

/// One-line stderr report with the whole cause chain.
fn diagnostic(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}

fn run(config: RenderConfig) -> anyhow::Result<()> {
    log::info!(
        "rendering {}x{} triangle on {:?}",
        config.width,
        config.height,
        config.device
    );

    let summary = render_to_file(&config).context("headless render failed")?;

    log::info!(
        "{} -> {} ({}x{})",
        summary.device.display(),
        summary.output.display(),
        summary.width,
        summary.height
    );
    log::info!(
        "centre pixel {:?}, corner pixel {:?}",
        summary.center,
        summary.corner
    );
    Ok(())
}
