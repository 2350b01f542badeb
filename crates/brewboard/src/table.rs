use brewboard_core::Order;

/// Box-drawn table of orders, optionally with a total column.
pub struct TableFormatter {
    id_width: usize,
    name_width: usize,
    drink_width: usize,
    size_width: usize,
    milk_width: usize,
    extras_width: usize,
    placed_width: usize,
    total_width: Option<usize>,
}

impl TableFormatter {
    pub fn new(orders: &[Order]) -> Self {
        let id_width = orders
            .iter()
            .map(|o| o.order_id.chars().count())
            .max()
            .unwrap_or(8)
            .clamp(8, 30);
        let name_width = orders
            .iter()
            .map(|o| o.customer_name.chars().count())
            .max()
            .unwrap_or(8)
            .clamp(8, 20);

        Self {
            id_width,
            name_width,
            drink_width: 12,
            size_width: 6,
            milk_width: 8,
            extras_width: 24,
            placed_width: 19,
            total_width: None,
        }
    }

    pub fn with_totals(mut self) -> Self {
        self.total_width = Some(7);
        self
    }

    /// Render one table; `totals` must line up with `orders` when totals are on.
    pub fn render(&self, orders: &[Order], totals: &[String]) -> String {
        let mut lines = vec![self.border('┌', '┬', '┐'), self.header_row()];
        lines.push(self.border('├', '┼', '┤'));
        for (i, order) in orders.iter().enumerate() {
            lines.push(self.row(order, totals.get(i).map(String::as_str)));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = vec![
            self.id_width,
            self.name_width,
            self.drink_width,
            self.size_width,
            self.milk_width,
            self.extras_width,
            self.placed_width,
        ];
        widths.extend(self.total_width);
        widths
    }

    fn cells(&self, values: &[&str]) -> String {
        let cells: Vec<String> = self
            .widths()
            .iter()
            .zip(values)
            .map(|(&width, value)| truncate(value, width))
            .collect();
        format!("│ {} │", cells.join(" │ "))
    }

    fn header_row(&self) -> String {
        let mut headers = vec!["Order", "Name", "Drink", "Size", "Milk", "Extras", "Placed"];
        if self.total_width.is_some() {
            headers.push("Total");
        }
        self.cells(&headers)
    }

    fn row(&self, order: &Order, total: Option<&str>) -> String {
        let extras = if order.extras.is_empty() {
            "-".to_string()
        } else {
            order.extras.join(", ")
        };
        let placed = order
            .placed_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| order.timestamp.clone());

        let mut values = vec![
            order.order_id.as_str(),
            order.customer_name.as_str(),
            order.drink_type.as_str(),
            order.size.as_str(),
            order.milk.as_str(),
            extras.as_str(),
            placed.as_str(),
        ];
        if self.total_width.is_some() {
            values.push(total.unwrap_or(""));
        }
        self.cells(&values)
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .widths()
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
