use clap::ArgMatches;
use tracing::info;

use brewboard_core::{DrinkSize, Order, price};

pub(crate) fn handle_price_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let drink = matches
        .get_one::<String>("drink")
        .ok_or("Drink argument is required")?;
    let size = matches
        .get_one::<String>("size")
        .ok_or("Size argument is required")?;
    let extras: Vec<String> = matches
        .get_many::<String>("extra")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let order = Order {
        order_id: String::new(),
        drink_type: drink.clone(),
        size: DrinkSize::from(size.clone()),
        milk: String::new(),
        extras,
        customer_name: String::new(),
        timestamp: String::new(),
    };
    let total = price(&order);

    info!(
        event = "cli.price_completed",
        drink = %drink,
        size = %order.size,
        extras = order.extras.len(),
        total = %total,
    );

    println!("{}", total);
    Ok(())
}
