use clap::ArgMatches;
use tracing::error;

use brewboard_core::events;

pub mod helpers;

mod config;
mod orders;
mod price;
mod receipts;
mod transcript;
mod watch;

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    let result = match matches.subcommand() {
        Some(("orders", sub_matches)) => orders::handle_orders_command(sub_matches).await,
        Some(("receipts", sub_matches)) => receipts::handle_receipts_command(sub_matches).await,
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches).await,
        Some(("transcript", sub_matches)) => {
            transcript::handle_transcript_command(sub_matches).await
        }
        Some(("price", sub_matches)) => price::handle_price_command(sub_matches),
        Some(("config", sub_matches)) => config::handle_config_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown();
    result
}
