use clap::ArgMatches;
use tracing::info;

use super::helpers::load_config_with_warning;

pub(crate) fn handle_config_command(_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();
    if let Err(e) = config.validate() {
        eprintln!("Warning: {}", e);
    }

    // Print effective values, not just what the files set
    let mut effective = config.clone();
    effective.endpoint.base_url = Some(config.endpoint.base_url().to_string());
    effective.endpoint.fetch_timeout_ms = Some(config.endpoint.fetch_timeout().as_millis() as u64);
    effective.orders.refresh_interval_ms =
        Some(config.orders.refresh_interval().as_millis() as u64);
    effective.orders.display_cap = Some(config.orders.display_cap());
    effective.receipts.refresh_interval_ms =
        Some(config.receipts.refresh_interval().as_millis() as u64);
    effective.transcript.clear_after_ms = Some(config.transcript.clear_after().as_millis() as u64);
    effective.stages.tick_ms = Some(config.stages.tick().as_millis() as u64);

    print!("{}", toml::to_string_pretty(&effective)?);

    info!(event = "cli.config_completed");
    Ok(())
}
