pub mod format;

use std::fmt::Write;

use crate::market_data::types::{CommodityQuote, MarketDataSnapshot};
use format::{ChangeDirection, capitalize, escape_html, format_change, format_price};

pub const HEADING: &str = "Live LME Prices";
pub const ERROR_MESSAGE: &str = "Error loading market data";
pub const LOADING_MESSAGE: &str = "Loading...";
pub const UNIT_SUFFIX: &str = "per tonne";

/// Full container markup for a decoded snapshot: heading plus one block per
/// commodity, in snapshot order.
pub fn render_snapshot(snapshot: &MarketDataSnapshot) -> String {
    let mut html = heading();
    for (name, quote) in snapshot.iter() {
        push_block(&mut html, name, quote);
    }
    html
}

/// Markup shown when the snapshot could not be fetched or decoded.
pub fn render_error() -> String {
    format!("{}<p class=\"error\">{ERROR_MESSAGE}</p>", heading())
}

/// Placeholder shown while the first request is in flight.
pub fn render_loading() -> String {
    format!("{}<p class=\"loading\">{LOADING_MESSAGE}</p>", heading())
}

fn heading() -> String {
    format!("<h3>{HEADING}</h3>")
}

fn push_block(html: &mut String, name: &str, quote: &CommodityQuote) {
    let class = ChangeDirection::of(quote.change).css_class();
    // Writing into a String cannot fail
    let _ = write!(
        html,
        "<div class=\"metal-price\">\
         <div class=\"metal-name\">{name}</div>\
         <div class=\"price\">${price}</div>\
         <div class=\"unit\">{UNIT_SUFFIX}</div>\
         <div class=\"change {class}\">{change}</div>\
         </div>",
        name = escape_html(&capitalize(name)),
        price = format_price(quote.price),
        change = format_change(quote.change),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(price: f64, change: f64) -> CommodityQuote {
        CommodityQuote { price, change }
    }

    #[test]
    fn test_render_copper_example() {
        let snapshot: MarketDataSnapshot = [("copper", quote(9000.0, 1.5))].into_iter().collect();
        let html = render_snapshot(&snapshot);

        assert!(html.starts_with("<h3>Live LME Prices</h3>"));
        assert!(html.contains("Copper"));
        assert!(html.contains("$9,000"));
        assert!(html.contains("+1.50%"));
        assert!(html.contains("per tonne"));
        assert!(html.contains("change positive"));
    }

    #[test]
    fn test_one_block_per_entry() {
        let snapshot: MarketDataSnapshot = [
            ("copper", quote(10380.45, 1.21)),
            ("aluminum", quote(2657.0, 0.95)),
            ("zinc", quote(2890.0, 0.15)),
            ("lead", quote(2050.0, -0.32)),
            ("nickel", quote(17116.12, 0.11)),
            ("tin", quote(30607.60, -0.15)),
        ]
        .into_iter()
        .collect();
        let html = render_snapshot(&snapshot);

        assert_eq!(html.matches("class=\"metal-price\"").count(), 6);
        for name in ["Copper", "Aluminum", "Zinc", "Lead", "Nickel", "Tin"] {
            assert_eq!(html.matches(&format!(">{name}<")).count(), 1, "{name}");
        }
        assert!(html.contains("$10,380.45"));
        assert!(html.contains("$30,607.6<"));

        // Blocks follow snapshot order
        let copper = html.find("Copper").unwrap();
        let tin = html.find("Tin").unwrap();
        assert!(copper < tin);
    }

    #[test]
    fn test_negative_change_markup() {
        let snapshot: MarketDataSnapshot = [("lead", quote(2050.0, -0.32))].into_iter().collect();
        let html = render_snapshot(&snapshot);

        assert!(html.contains("<div class=\"change negative\">-0.32%</div>"));
        assert!(!html.contains("+-"));
        assert!(!html.contains("positive"));
    }

    #[test]
    fn test_empty_snapshot_renders_heading_only() {
        assert_eq!(render_snapshot(&MarketDataSnapshot::new()), "<h3>Live LME Prices</h3>");
    }

    #[test]
    fn test_names_are_escaped() {
        let snapshot: MarketDataSnapshot = [("<script>", quote(1.0, 0.0))].into_iter().collect();
        let html = render_snapshot(&snapshot);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_error_and_loading_markup() {
        assert!(render_error().contains(ERROR_MESSAGE));
        assert!(render_error().starts_with("<h3>Live LME Prices</h3>"));
        assert!(render_loading().contains(LOADING_MESSAGE));
    }
}
