use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};

use brewboard_core::panels::{OrderDisplay, ProcessingIndicator};
use brewboard_core::{Order, events, price};

use super::helpers::{config_for, order_fetcher};

pub(crate) async fn handle_watch_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let duration = matches
        .get_one::<u64>("duration-secs")
        .map(|secs| Duration::from_secs(*secs));
    let show_stages = !matches.get_flag("no-stages");
    let config = config_for(matches);

    info!(
        event = "cli.watch_started",
        duration_secs = duration.map(|d| d.as_secs()),
        stages = show_stages
    );

    let mut display = match OrderDisplay::from_config(&config, order_fetcher(&config)) {
        Ok(display) => display,
        Err(e) => {
            eprintln!("❌ Failed to start watching: {}", e);
            error!(event = "cli.watch_failed", error = %e);
            events::log_app_error(&e);
            return Err(e.into());
        }
    };
    let mut indicator = ProcessingIndicator::from_config(&config)?;

    let mut orders = display.subscribe();
    let mut stages = indicator.subscribe();
    display.set_visible(true);
    indicator.set_visible(show_stages);

    println!("Watching orders (Ctrl-C to stop)...");

    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut last_shown: Option<String> = None;
    let mut last_error: Option<String> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = &mut deadline => break,
            changed = orders.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = orders.borrow_and_update().clone();
                match snapshot.items().first() {
                    Some(order) if last_shown.as_deref() != Some(order.order_id.as_str()) => {
                        println!("{}", describe(order));
                        last_shown = Some(order.order_id.clone());
                    }
                    _ => {}
                }
                let error = snapshot.last_error().map(str::to_string);
                if error.is_some() && error != last_error {
                    eprintln!("⚠️  Refresh failed, showing last known orders: {}", error.as_deref().unwrap_or_default());
                }
                last_error = error;
            }
            changed = stages.changed(), if show_stages => {
                if changed.is_err() {
                    break;
                }
                let stage = stages.borrow_and_update().stage();
                println!("   {}", stage);
            }
        }
    }

    display.set_visible(false);
    indicator.set_visible(false);

    info!(event = "cli.watch_completed");
    Ok(())
}

fn describe(order: &Order) -> String {
    let extras = if order.extras.is_empty() {
        String::new()
    } else {
        format!(" + {}", order.extras.join(", "))
    };
    format!(
        "☕ {} {} {} ({} milk){} for {} - {}",
        order.order_id,
        order.size,
        order.drink_type,
        order.milk,
        extras,
        order.customer_name,
        price(order)
    )
}
