use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Cup size of an order.
///
/// Sizes outside the known three are kept verbatim so a new size on the
/// backend does not make the whole payload unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DrinkSize {
    Small,
    Medium,
    Large,
    Other(String),
}

impl DrinkSize {
    pub fn as_str(&self) -> &str {
        match self {
            DrinkSize::Small => "small",
            DrinkSize::Medium => "medium",
            DrinkSize::Large => "large",
            DrinkSize::Other(s) => s,
        }
    }
}

impl From<String> for DrinkSize {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "small" => DrinkSize::Small,
            "medium" => DrinkSize::Medium,
            "large" => DrinkSize::Large,
            _ => DrinkSize::Other(s),
        }
    }
}

impl From<DrinkSize> for String {
    fn from(size: DrinkSize) -> Self {
        size.as_str().to_string()
    }
}

impl std::fmt::Display for DrinkSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted coffee order, as written by the ordering agent.
///
/// Read-only on this side: orders are fetched, shown, and replaced by the
/// next snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    #[serde(rename = "drinkType")]
    pub drink_type: String,
    pub size: DrinkSize,
    #[serde(default)]
    pub milk: String,
    #[serde(default)]
    pub extras: Vec<String>,
    #[serde(rename = "name")]
    pub customer_name: String,
    /// ISO-8601 datetime; the agent writes it without an offset.
    pub timestamp: String,
}

impl Order {
    /// Parse `timestamp`, accepting both offset and naive ISO forms.
    pub fn placed_at(&self) -> Option<NaiveDateTime> {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }

    pub fn has_whipped_cream(&self) -> bool {
        self.extras
            .iter()
            .any(|extra| extra.to_lowercase().contains("whipped"))
    }
}

/// Body of `GET /api/orders`.
///
/// A body without the `orders` field is malformed, not empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersPayload {
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT_ORDER: &str = r#"{
        "drinkType": "latte",
        "size": "large",
        "milk": "oat",
        "extras": ["whipped cream", "vanilla syrup"],
        "name": "Priya",
        "timestamp": "2025-11-23T14:05:09.123456",
        "order_id": "order_20251123_140509"
    }"#;

    #[test]
    fn test_deserialize_agent_order() {
        let order: Order = serde_json::from_str(AGENT_ORDER).unwrap();
        assert_eq!(order.order_id, "order_20251123_140509");
        assert_eq!(order.drink_type, "latte");
        assert_eq!(order.size, DrinkSize::Large);
        assert_eq!(order.customer_name, "Priya");
        assert_eq!(order.extras.len(), 2);
        assert!(order.has_whipped_cream());
    }

    #[test]
    fn test_unknown_size_is_preserved() {
        let order: Order = serde_json::from_str(
            r#"{"drinkType":"mocha","size":"venti","name":"Sam","timestamp":"2025-01-01T00:00:00","order_id":"o1"}"#,
        )
        .unwrap();
        assert_eq!(order.size, DrinkSize::Other("venti".to_string()));
        assert!(order.extras.is_empty());
        assert_eq!(order.milk, "");

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["size"], "venti");
        assert_eq!(json["drinkType"], "mocha");
        assert_eq!(json["name"], "Sam");
    }

    #[test]
    fn test_placed_at_accepts_naive_and_offset_forms() {
        let mut order: Order = serde_json::from_str(AGENT_ORDER).unwrap();
        assert!(order.placed_at().is_some());

        order.timestamp = "2025-11-23T14:05:09Z".to_string();
        assert!(order.placed_at().is_some());

        order.timestamp = "yesterday".to_string();
        assert!(order.placed_at().is_none());
    }

    #[test]
    fn test_payload_without_orders_field_is_rejected() {
        let result = serde_json::from_str::<OrdersPayload>(r#"{"items": []}"#);
        assert!(result.is_err());
    }
}
