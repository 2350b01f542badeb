use clap::ArgMatches;
use tracing::{error, info};

use brewboard_core::events;

use super::helpers::{config_for, fetch_orders_once};
use crate::table::TableFormatter;

pub(crate) async fn handle_orders_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let show_all = matches.get_flag("all");
    let config = config_for(matches);

    info!(event = "cli.orders_started", json_output = json_output, all = show_all);

    match fetch_orders_once(&config).await {
        Ok(mut orders) => {
            if !show_all {
                orders.truncate(config.orders.display_cap());
            }

            if json_output {
                println!("{}", serde_json::to_string_pretty(&orders)?);
            } else if orders.is_empty() {
                println!("No orders yet.");
            } else {
                let formatter = TableFormatter::new(&orders);
                println!("{}", formatter.render(&orders, &[]));
            }

            info!(event = "cli.orders_completed", count = orders.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to fetch orders: {}", e);

            error!(
                event = "cli.orders_failed",
                error = %e
            );

            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
