mod bootstrap;

use clap::Parser;
use readstats_core::error::{AnalyticsError, Result};
use readstats_core::settings::Settings;
use readstats_data::analysis;
use readstats_data::ingest;

fn main() {
    let settings = Settings::parse();

    if let Err(err) =
        bootstrap::setup_logging(settings.effective_log_level(), settings.log_file.as_ref())
    {
        eprintln!("Failed to initialise logging: {err}");
        std::process::exit(1);
    }

    tracing::info!("readstats v{} starting", env!("CARGO_PKG_VERSION"));

    match run(&settings) {
        Ok(payload) => println!("{payload}"),
        Err(err) => {
            eprintln!("Error: {err}");
            // Bad input exits 2, engine or host trouble exits 1.
            std::process::exit(if err.is_client_error() { 2 } else { 1 });
        }
    }
}

/// Analyze the configured input and render the report as a JSON string.
fn run(settings: &Settings) -> Result<String> {
    let options = settings.analyze_options()?;
    let input = bootstrap::resolve_input(&settings.input)?;
    tracing::info!("Analyzing {}", input.display());

    let table = ingest::read_table(&input)?;
    let report = analysis::analyze(&table, &options)?;

    let payload = if settings.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|err| AnalyticsError::Other(err.into()))?;

    Ok(payload)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
