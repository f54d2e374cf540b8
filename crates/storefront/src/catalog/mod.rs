//! Menu and coupon reference data.
//!
//! The catalog is loaded once at startup and never mutated. Cart lines copy
//! what they need from a [`MenuItem`] at add time (see [`MenuItem::snapshot`]),
//! so nothing here is referenced live by a cart.

mod data;

use serde::{Deserialize, Serialize};

use delizio_core::{MenuItemId, Money};
use rust_decimal::Decimal;

use crate::cart::{ItemSnapshot, SelectedOptions};

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    /// Slug used for filtering (e.g. `starters`).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// One selectable choice within an option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub name: String,
    /// Added to the item's base price when selected.
    pub price_delta: Money,
}

/// A named group of mutually exclusive choices (e.g. `size`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub name: String,
    pub choices: Vec<OptionChoice>,
}

impl OptionGroup {
    /// Look up a choice by name.
    #[must_use]
    pub fn choice(&self, name: &str) -> Option<&OptionChoice> {
        self.choices.iter().find(|c| c.name == name)
    }
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    /// Category slug, matching a [`MenuCategory::id`].
    pub category: String,
    /// Base price before option deltas.
    pub price: Money,
    pub image: String,
    pub description: String,
    /// Option groups in display order.
    pub options: Vec<OptionGroup>,
    pub is_vegan: bool,
    pub is_popular: bool,
}

impl MenuItem {
    /// Look up an option group by name.
    #[must_use]
    pub fn option_group(&self, name: &str) -> Option<&OptionGroup> {
        self.options.iter().find(|g| g.name == name)
    }

    /// Unit price with the selected options' deltas applied.
    ///
    /// Selections naming an unknown group or choice contribute nothing.
    #[must_use]
    pub fn unit_price(&self, selected: &SelectedOptions) -> Money {
        let deltas: Money = selected
            .iter()
            .filter_map(|(group, choice)| self.option_group(group)?.choice(choice))
            .map(|choice| choice.price_delta)
            .sum();
        self.price + deltas
    }

    /// Denormalized copy of this item for a cart line, with the option
    /// deltas baked into the unit price.
    #[must_use]
    pub fn snapshot(&self, selected: &SelectedOptions) -> ItemSnapshot {
        ItemSnapshot {
            item_id: self.id,
            name: self.name.clone(),
            unit_price: self.unit_price(selected),
            image: self.image.clone(),
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

/// A percentage discount gated by a minimum subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Upper-case code. Matching is case-insensitive.
    pub code: String,
    /// Percentage off the subtotal, 0 to 100.
    pub discount_percent: Decimal,
    /// Subtotal required at the moment the coupon is applied.
    pub min_order: Money,
    pub description: String,
}

/// Filters for browsing the menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MenuQuery {
    /// Category slug. `None` or `all` means every category.
    pub category: Option<String>,
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    /// Only return vegan items.
    #[serde(default)]
    pub vegan_only: bool,
}

/// Static menu and coupon data.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<MenuCategory>,
    items: Vec<MenuItem>,
    coupons: Vec<Coupon>,
}

impl Catalog {
    /// Build a catalog from explicit data.
    #[must_use]
    pub const fn new(
        categories: Vec<MenuCategory>,
        items: Vec<MenuItem>,
        coupons: Vec<Coupon>,
    ) -> Self {
        Self {
            categories,
            items,
            coupons,
        }
    }

    /// The restaurant's reference menu and coupons.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(data::categories(), data::menu_items(), data::coupons())
    }

    #[must_use]
    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Look up a menu item by ID.
    #[must_use]
    pub fn item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Look up a coupon by code, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn coupon(&self, code: &str) -> Option<&Coupon> {
        let code = code.trim();
        self.coupons
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Items matching every filter in `query`, in menu order.
    #[must_use]
    pub fn search(&self, query: &MenuQuery) -> Vec<&MenuItem> {
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();

        self.items
            .iter()
            .filter(|item| category.is_none_or(|c| item.category.eq_ignore_ascii_case(c)))
            .filter(|item| needle.is_empty() || item.matches_search(&needle))
            .filter(|item| !query.vegan_only || item.is_vegan)
            .collect()
    }

    /// Items flagged as popular, in menu order.
    #[must_use]
    pub fn popular(&self) -> Vec<&MenuItem> {
        self.items.iter().filter(|item| item.is_popular).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> SelectedOptions {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.items().len(), 20);
        assert_eq!(catalog.categories().len(), 5);
        assert_eq!(catalog.coupons().len(), 3);
    }

    #[test]
    fn test_coupon_lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        let coupon = catalog.coupon(" welcome10 ").unwrap();
        assert_eq!(coupon.code, "WELCOME10");
        assert_eq!(coupon.min_order, Money::from_dollars(25));
        assert!(catalog.coupon("FREEFOOD").is_none());
    }

    #[test]
    fn test_unit_price_applies_option_deltas() {
        let catalog = Catalog::builtin();
        let carbonara = catalog.item(MenuItemId::new(5)).unwrap();

        let base = carbonara.unit_price(&SelectedOptions::new());
        assert_eq!(base, Money::from_cents(2299));

        let large_extra = carbonara.unit_price(&options(&[
            ("size", "Large"),
            ("extras", "Extra Pancetta"),
        ]));
        assert_eq!(large_extra, Money::from_cents(3199));
    }

    #[test]
    fn test_unit_price_ignores_unknown_options() {
        let catalog = Catalog::builtin();
        let bruschetta = catalog.item(MenuItemId::new(1)).unwrap();
        let price = bruschetta.unit_price(&options(&[("size", "Huge"), ("sauce", "Pesto")]));
        assert_eq!(price, bruschetta.price);
    }

    #[test]
    fn test_snapshot_bakes_price() {
        let catalog = Catalog::builtin();
        let cappuccino = catalog.item(MenuItemId::new(15)).unwrap();
        let snapshot = cappuccino.snapshot(&options(&[("milk", "Oat")]));
        assert_eq!(snapshot.item_id, cappuccino.id);
        assert_eq!(snapshot.unit_price, Money::from_cents(549));
    }

    #[test]
    fn test_search_by_category_and_vegan() {
        let catalog = Catalog::builtin();
        let query = MenuQuery {
            category: Some("beverages".to_string()),
            search: None,
            vegan_only: true,
        };
        let names: Vec<_> = catalog.search(&query).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Espresso", "Italian Soda", "House Wine"]);
    }

    #[test]
    fn test_search_matches_description() {
        let catalog = Catalog::builtin();
        let query = MenuQuery {
            category: Some("all".to_string()),
            search: Some("MASCARPONE".to_string()),
            vegan_only: false,
        };
        let results = catalog.search(&query);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Tiramisu");
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search(&MenuQuery::default()).len(), 20);
    }

    #[test]
    fn test_popular() {
        let catalog = Catalog::builtin();
        assert!(catalog.popular().iter().all(|item| item.is_popular));
        assert!(!catalog.popular().is_empty());
    }
}
