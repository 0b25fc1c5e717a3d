//! Quote Rendering
//!
//! Plain-text tabular rendering of an order quote, for audit output and
//! the demo binary.

use rust_decimal::RoundingStrategy;
use tabled::{Table, Tabled, settings::Style};

use crate::orders::OrderQuote;

/// One rendered row of the quote table.
#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "line")]
    line: usize,

    #[tabled(rename = "pricing")]
    pricing: String,

    #[tabled(rename = "qty")]
    quantity: u32,

    #[tabled(rename = "unit")]
    unit_price: String,

    #[tabled(rename = "subtotal")]
    subtotal: String,

    #[tabled(rename = "discount")]
    discount: String,

    #[tabled(rename = "total")]
    total: String,

    #[tabled(rename = "margin")]
    margin: String,

    #[tabled(rename = "viable")]
    viable: &'static str,
}

/// Render an order quote as a plain-text table.
///
/// One row per line, followed by a summary row with the order totals.
pub fn order_table(order: &OrderQuote<'_>) -> String {
    let mut rows: Vec<QuoteRow> = order
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| QuoteRow {
            line: index + 1,
            pricing: line.applied().to_string(),
            quantity: line.quantity(),
            unit_price: line.unit_price().to_string(),
            subtotal: line.subtotal().to_string(),
            discount: line.discount().to_string(),
            total: line.total().to_string(),
            margin: line.margin().margin_percent().map_or_else(
                || "n/a".to_string(),
                |margin| {
                    format!(
                        "{}%",
                        margin.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
                    )
                },
            ),
            viable: if line.viable() { "yes" } else { "NO" },
        })
        .collect();

    rows.push(QuoteRow {
        line: rows.len() + 1,
        pricing: "order total".to_string(),
        quantity: 0,
        unit_price: String::new(),
        subtotal: order.subtotal().to_string(),
        discount: order.discount().to_string(),
        total: order.total().to_string(),
        margin: String::new(),
        viable: if order.all_viable() { "yes" } else { "NO" },
    });

    let mut table = Table::new(rows);
    table.with(Style::sharp());

    table.to_string()
}
