use clap::ArgMatches;
use tracing::{error, info};

use brewboard_core::{Receipt, events};

use super::helpers::{config_for, fetch_orders_once};
use crate::table::TableFormatter;

pub(crate) async fn handle_receipts_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let config = config_for(matches);

    info!(event = "cli.receipts_started", json_output = json_output);

    match fetch_orders_once(&config).await {
        Ok(orders) => {
            let receipts: Vec<Receipt> = orders.into_iter().map(Receipt::from).collect();

            if json_output {
                println!("{}", serde_json::to_string_pretty(&receipts)?);
            } else if receipts.is_empty() {
                println!("No receipts yet.");
            } else {
                let (orders, totals): (Vec<_>, Vec<_>) =
                    receipts.into_iter().map(|r| (r.order, r.total)).unzip();
                let formatter = TableFormatter::new(&orders).with_totals();
                println!("🧾 Receipts ({})", orders.len());
                println!("{}", formatter.render(&orders, &totals));
            }

            info!(event = "cli.receipts_completed");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to fetch receipts: {}", e);

            error!(
                event = "cli.receipts_failed",
                error = %e
            );

            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
