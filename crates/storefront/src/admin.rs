//! Admin dashboard figures computed from an order history.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use delizio_core::{MenuItemId, Money, OrderId, OrderStatus, OrderType};

use crate::models::Order;

/// Orders listed under "Recent Orders".
pub const RECENT_ORDER_LIMIT: usize = 5;

/// Items listed under "Top Items".
pub const TOP_ITEM_LIMIT: usize = 5;

/// Recent order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentOrderView {
    pub id: OrderId,
    pub order_type: OrderType,
    pub total: Money,
    pub status: OrderStatus,
    pub item_count: u64,
}

impl From<&Order> for RecentOrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_type: order.order_type,
            total: order.total(),
            status: order.status,
            item_count: order.item_count(),
        }
    }
}

/// Best-selling item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub item_id: MenuItemId,
    pub name: String,
    /// Units sold across all orders.
    pub units: u64,
    /// Line totals across all orders, before discounts.
    pub revenue: Money,
}

/// Dashboard totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_revenue: Money,
    pub total_orders: usize,
    /// Rounded to cents; zero with no orders.
    pub average_order: Money,
    /// Distinct menu items ever ordered.
    pub distinct_items: usize,
    pub orders_by_status: BTreeMap<String, usize>,
    /// Newest first.
    pub recent_orders: Vec<RecentOrderView>,
    /// Most units first; ties broken by revenue, then name.
    pub top_items: Vec<TopItem>,
}

impl DashboardStats {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        let total_revenue: Money = orders.iter().map(Order::total).sum();
        let average_order = match u64::try_from(orders.len()) {
            Ok(0) | Err(_) => Money::ZERO,
            Ok(count) => Money::new(total_revenue.amount() / Decimal::from(count)).rounded(),
        };

        let mut orders_by_status = BTreeMap::new();
        for order in orders {
            *orders_by_status.entry(order.status.to_string()).or_insert(0) += 1;
        }

        let mut recent: Vec<&Order> = orders.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let recent_orders = recent
            .into_iter()
            .take(RECENT_ORDER_LIMIT)
            .map(RecentOrderView::from)
            .collect();

        let mut items: HashMap<MenuItemId, TopItem> = HashMap::new();
        for line in orders.iter().flat_map(|order| &order.items) {
            let entry = items.entry(line.item.item_id).or_insert_with(|| TopItem {
                item_id: line.item.item_id,
                name: line.item.name.clone(),
                units: 0,
                revenue: Money::ZERO,
            });
            entry.units += u64::from(line.quantity);
            entry.revenue += line.line_total();
        }
        let distinct_items = items.len();

        let mut top_items: Vec<TopItem> = items.into_values().collect();
        top_items.sort_by(|a, b| {
            b.units
                .cmp(&a.units)
                .then(b.revenue.cmp(&a.revenue))
                .then_with(|| a.name.cmp(&b.name))
        });
        top_items.truncate(TOP_ITEM_LIMIT);

        Self {
            total_revenue,
            total_orders: orders.len(),
            average_order,
            distinct_items,
            orders_by_status,
            recent_orders,
            top_items,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use delizio_core::PaymentMethod;

    use super::*;
    use crate::cart::{CartLineItem, CartState, ItemSnapshot, SelectedOptions};
    use crate::pricing::PriceBreakdown;

    fn line(id: i64, name: &str, cents: i64, quantity: u32) -> CartLineItem {
        CartState::new_line(
            ItemSnapshot {
                item_id: MenuItemId::new(id),
                name: name.to_string(),
                unit_price: Money::from_cents(cents),
                image: String::new(),
            },
            quantity,
            SelectedOptions::new(),
        )
    }

    fn order(id: i64, minutes_ago: i64, status: OrderStatus, items: Vec<CartLineItem>) -> Order {
        let subtotal: Money = items.iter().map(CartLineItem::line_total).sum();
        Order {
            id: OrderId::new(id),
            items,
            pricing: PriceBreakdown {
                subtotal,
                delivery_fee: Money::ZERO,
                discount: Money::ZERO,
                tip: Money::ZERO,
                total: subtotal,
            },
            coupon_code: None,
            order_type: OrderType::Pickup,
            status,
            estimated_time: OrderType::Pickup.estimated_time().to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            delivery_info: None,
            payment_method: PaymentMethod::Card,
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = DashboardStats::from_orders(&[]);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, Money::ZERO);
        assert_eq!(stats.average_order, Money::ZERO);
        assert!(stats.top_items.is_empty());
    }

    #[test]
    fn test_totals_and_rankings() {
        let orders = vec![
            order(
                1,
                30,
                OrderStatus::Completed,
                vec![
                    line(5, "Spaghetti Carbonara", 2299, 2),
                    line(13, "Tiramisu", 899, 1),
                ],
            ),
            order(2, 10, OrderStatus::Preparing, vec![line(13, "Tiramisu", 899, 3)]),
            order(
                3,
                20,
                OrderStatus::Completed,
                vec![line(1, "Bruschetta Classica", 1299, 1)],
            ),
        ];
        let stats = DashboardStats::from_orders(&orders);

        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_revenue, Money::from_cents(2299 * 2 + 899 * 4 + 1299));
        assert_eq!(stats.average_order, Money::from_cents(3164));
        assert_eq!(stats.distinct_items, 3);
        assert_eq!(stats.orders_by_status.get("completed"), Some(&2));
        assert_eq!(stats.orders_by_status.get("preparing"), Some(&1));

        let recent: Vec<_> = stats.recent_orders.iter().map(|o| o.id.as_i64()).collect();
        assert_eq!(recent, [2, 3, 1]);

        assert_eq!(stats.top_items[0].name, "Tiramisu");
        assert_eq!(stats.top_items[0].units, 4);
        assert_eq!(stats.top_items[0].revenue, Money::from_cents(3596));
        assert_eq!(stats.top_items[1].name, "Spaghetti Carbonara");
    }
}
