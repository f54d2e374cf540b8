//! Cart line items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use delizio_core::{CartLineId, MenuItemId, Money};

/// Chosen option per option group (e.g. `size` -> `Large`).
///
/// Backed by an ordered map, so two selections are equal when they hold the
/// same group/choice pairs regardless of the order they were chosen in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedOptions(BTreeMap<String, String>);

impl SelectedOptions {
    /// No options selected.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Select `choice` for `group`, replacing any previous choice.
    pub fn select(&mut self, group: impl Into<String>, choice: impl Into<String>) {
        self.0.insert(group.into(), choice.into());
    }

    /// The choice selected for `group`, if any.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<&str> {
        self.0.get(group).map(String::as_str)
    }

    /// Iterate `(group, choice)` pairs ordered by group name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(g, c)| (g.as_str(), c.as_str()))
    }

    /// Whether no option has been chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of option groups with a choice.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<G: Into<String>, C: Into<String>> FromIterator<(G, C)> for SelectedOptions {
    fn from_iter<I: IntoIterator<Item = (G, C)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(g, c)| (g.into(), c.into()))
                .collect(),
        )
    }
}

impl std::fmt::Display for SelectedOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (group, choice) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{group}: {choice}")?;
            first = false;
        }
        Ok(())
    }
}

/// Menu item data copied into a cart line at add time.
///
/// Later catalog price changes never reach lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub item_id: MenuItemId,
    pub name: String,
    /// Base price plus the selected options' deltas.
    pub unit_price: Money,
    pub image: String,
}

/// One distinct entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub cart_id: CartLineId,
    #[serde(flatten)]
    pub item: ItemSnapshot,
    #[serde(default)]
    pub options: SelectedOptions,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
}

impl CartLineItem {
    /// Whether an add of `item_id` with `options` merges into this line.
    #[must_use]
    pub fn same_line(&self, item_id: MenuItemId, options: &SelectedOptions) -> bool {
        self.item.item_id == item_id && self.options == *options
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.item.unit_price * self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_equality_ignores_selection_order() {
        let mut a = SelectedOptions::new();
        a.select("size", "Large");
        a.select("crust", "Thin");

        let b: SelectedOptions = [("crust", "Thin"), ("size", "Large")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_option_inequality() {
        let a: SelectedOptions = [("size", "Large")].into_iter().collect();
        let b: SelectedOptions = [("size", "Regular")].into_iter().collect();
        assert_ne!(a, b);
        assert_ne!(a, SelectedOptions::new());
    }

    #[test]
    fn test_display() {
        let options: SelectedOptions = [("size", "Large"), ("extras", "Extra Cheese")]
            .into_iter()
            .collect();
        assert_eq!(options.to_string(), "extras: Extra Cheese, size: Large");
    }

    #[test]
    fn test_line_total() {
        let line = CartLineItem {
            cart_id: CartLineId::generate(),
            item: ItemSnapshot {
                item_id: MenuItemId::new(1),
                name: "Bruschetta Classica".to_string(),
                unit_price: Money::from_cents(1299),
                image: String::new(),
            },
            options: SelectedOptions::new(),
            quantity: 3,
        };
        assert_eq!(line.line_total(), Money::from_cents(3897));
    }
}
