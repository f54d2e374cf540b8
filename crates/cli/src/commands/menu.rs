//! Menu and coupon listing commands.
//!
//! # Usage
//!
//! ```bash
//! delizio menu --category desserts
//! delizio menu --search pasta --vegan
//! delizio coupons
//! ```

use delizio_storefront::catalog::{Catalog, MenuItem, MenuQuery};

/// Log every menu item matching the filters.
pub fn list(category: Option<String>, search: Option<String>, vegan_only: bool) {
    let catalog = Catalog::builtin();
    let query = MenuQuery {
        category,
        search,
        vegan_only,
    };

    let items = catalog.search(&query);
    if items.is_empty() {
        tracing::info!("No menu items match");
        return;
    }
    for item in items {
        tracing::info!("{}", describe(item));
    }
}

/// Log every coupon code with its terms.
pub fn coupons() {
    for coupon in Catalog::builtin().coupons() {
        tracing::info!(
            "{:<10} {}% off, min {} - {}",
            coupon.code,
            coupon.discount_percent,
            coupon.min_order,
            coupon.description
        );
    }
}

fn describe(item: &MenuItem) -> String {
    let mut line = format!("#{:<3} {:<28} {:>8}", item.id.as_i64(), item.name, item.price.to_string());
    if item.is_vegan {
        line.push_str("  [vegan]");
    }
    if item.is_popular {
        line.push_str("  [popular]");
    }
    for group in &item.options {
        let choices: Vec<String> = group
            .choices
            .iter()
            .map(|c| {
                if c.price_delta.is_zero() {
                    c.name.clone()
                } else {
                    format!("{} +{}", c.name, c.price_delta)
                }
            })
            .collect();
        line.push_str(&format!("\n      {}: {}", group.name, choices.join(" | ")));
    }
    line
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delizio_core::MenuItemId;

    use super::*;

    #[test]
    fn test_describe_lists_option_deltas() {
        let catalog = Catalog::builtin();
        let carbonara = catalog.item(MenuItemId::new(5)).unwrap();
        let text = describe(carbonara);
        assert!(text.starts_with("#5   Spaghetti Carbonara"));
        assert!(text.contains("$22.99"));
        assert!(text.contains("[popular]"));
        assert!(text.contains("size: Regular | Large +$5.00"));
    }
}
