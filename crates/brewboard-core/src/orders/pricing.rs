//! Order pricing.
//!
//! Every panel that shows a total goes through [`price`], so the order card
//! and the receipts list can never disagree. Arithmetic is done in whole
//! cents.

use serde::{Deserialize, Serialize};

use crate::orders::types::{DrinkSize, Order};

/// Base price in cents for drinks missing from [`BASE_PRICES_CENTS`].
pub const DEFAULT_BASE_PRICE_CENTS: u64 = 400;

/// Surcharge in cents for each extra.
pub const EXTRA_PRICE_CENTS: u64 = 75;

const BASE_PRICES_CENTS: [(&str, u64); 6] = [
    ("espresso", 250),
    ("americano", 350),
    ("latte", 450),
    ("cappuccino", 400),
    ("mocha", 500),
    ("frappuccino", 550),
];

/// Base price for `drink_type`, matched without regard to case.
pub fn base_price_cents(drink_type: &str) -> u64 {
    BASE_PRICES_CENTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(drink_type))
        .map(|(_, cents)| *cents)
        .unwrap_or(DEFAULT_BASE_PRICE_CENTS)
}

impl DrinkSize {
    /// Size multiplier in percent. Unknown sizes price like a medium.
    pub fn multiplier_percent(&self) -> u64 {
        match self {
            DrinkSize::Small => 80,
            DrinkSize::Medium => 100,
            DrinkSize::Large => 130,
            DrinkSize::Other(_) => 100,
        }
    }
}

/// Total in cents: base × size multiplier, rounded half up, plus extras.
pub fn total_cents(order: &Order) -> u64 {
    let sized = (base_price_cents(&order.drink_type) * order.size.multiplier_percent() + 50) / 100;
    sized + order.extras.len() as u64 * EXTRA_PRICE_CENTS
}

pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Display price of an order, e.g. `$6.60`.
pub fn price(order: &Order) -> String {
    format_cents(total_cents(order))
}

/// An order with its computed total, as shown in the receipts panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(flatten)]
    pub order: Order,
    pub total: String,
}

impl From<Order> for Receipt {
    fn from(order: Order) -> Self {
        let total = price(&order);
        Self { order, total }
    }
}
