//! Price quote command.
//!
//! Builds a throwaway cart from the command line and prints the same
//! breakdown the checkout review step shows.
//!
//! # Usage
//!
//! ```bash
//! delizio quote 1 5x2:size=Large --order-type pickup --coupon WELCOME10 --tip 3.00
//! ```

use std::str::FromStr;

use thiserror::Error;

use delizio_core::{MenuItemId, Money, OrderType};
use delizio_storefront::cart::{CartStore, CouponError, SelectedOptions};
use delizio_storefront::catalog::Catalog;
use delizio_storefront::config::StorefrontConfig;
use delizio_storefront::pricing::{PriceBreakdown, PricingConfig, Tip, TipError};

/// Errors from building a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("No menu item with ID {0}")]
    UnknownItem(i64),

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error(transparent)]
    Tip(#[from] TipError),
}

/// One cart line given as `ID[xQTY][:group=choice,...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    pub item_id: i64,
    pub quantity: u32,
    pub options: SelectedOptions,
}

impl FromStr for LineSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, options_part) = match s.split_once(':') {
            Some((head, rest)) => (head, Some(rest)),
            None => (s, None),
        };
        let (id, quantity) = match head.split_once('x') {
            Some((id, qty)) => (id, qty),
            None => (head, "1"),
        };

        let item_id = id
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid item ID in '{s}'"))?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| format!("invalid quantity in '{s}'"))?;

        let mut options = SelectedOptions::new();
        for pair in options_part.into_iter().flat_map(|p| p.split(',')) {
            let (group, choice) = pair
                .split_once('=')
                .ok_or_else(|| format!("option '{pair}' should look like group=choice"))?;
            options.select(group.trim(), choice.trim());
        }

        Ok(Self {
            item_id,
            quantity,
            options,
        })
    }
}

/// Tip given as `18%` or a dollar amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipArg(pub Tip);

impl FromStr for TipArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let tip = if let Some(percent) = s.strip_suffix('%') {
            let percent = percent
                .trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid tip percentage '{s}'"))?;
            Tip::percent(percent)
        } else {
            let amount = Money::parse(s).map_err(|e| e.to_string())?;
            Tip::custom(amount)
        };
        tip.map(Self).map_err(|e| e.to_string())
    }
}

/// Price `lines` as one cart.
///
/// # Errors
///
/// Returns `QuoteError::UnknownItem` for an ID not on the menu and
/// `QuoteError::Coupon` if the coupon is unknown or the minimum is not met.
pub fn quote(
    catalog: &Catalog,
    lines: &[LineSpec],
    order_type: OrderType,
    coupon: Option<&str>,
    tip: Tip,
    pricing: &PricingConfig,
) -> Result<(CartStore, PriceBreakdown), QuoteError> {
    let mut cart = CartStore::new();
    for line in lines {
        let item = catalog
            .item(MenuItemId::new(line.item_id))
            .ok_or(QuoteError::UnknownItem(line.item_id))?;
        cart.add(
            item.snapshot(&line.options),
            line.quantity,
            line.options.clone(),
        );
    }
    if let Some(code) = coupon {
        cart.redeem(catalog, code)?;
    }
    let breakdown = PriceBreakdown::compute(cart.state(), order_type, tip.validate()?, pricing);
    Ok((cart, breakdown))
}

/// Log a quote for the given cart.
///
/// # Errors
///
/// See [`quote`].
pub fn run(
    lines: &[LineSpec],
    order_type: OrderType,
    coupon: Option<&str>,
    tip: TipArg,
    config: &StorefrontConfig,
) -> Result<(), QuoteError> {
    let catalog = Catalog::builtin();
    let (cart, breakdown) = quote(&catalog, lines, order_type, coupon, tip.0, &config.pricing)?;

    for line in cart.items() {
        let options = if line.options.is_empty() {
            String::new()
        } else {
            format!(" ({})", line.options)
        };
        tracing::info!(
            "{:>2} x {}{} {:>10}",
            line.quantity,
            line.item.name,
            options,
            line.line_total().to_string()
        );
    }
    tracing::info!("Subtotal      {:>10}", breakdown.subtotal.to_string());
    if order_type == OrderType::Delivery {
        tracing::info!("Delivery fee  {:>10}", breakdown.delivery_fee.to_string());
    }
    if !breakdown.discount.is_zero() {
        tracing::info!("Discount      {:>10}", (-breakdown.discount).to_string());
    }
    tracing::info!("Tip           {:>10}", breakdown.tip.to_string());
    tracing::info!("Total         {:>10}", breakdown.total.to_string());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_spec_parsing() {
        let line: LineSpec = "5x2:size=Large,extras=Extra Cheese".parse().unwrap();
        assert_eq!(line.item_id, 5);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.options.get("size"), Some("Large"));
        assert_eq!(line.options.get("extras"), Some("Extra Cheese"));

        let line: LineSpec = "12".parse().unwrap();
        assert_eq!(line.quantity, 1);
        assert!(line.options.is_empty());

        assert!("5x0".parse::<LineSpec>().is_err());
        assert!("abc".parse::<LineSpec>().is_err());
        assert!("5:size".parse::<LineSpec>().is_err());
    }

    #[test]
    fn test_tip_arg_parsing() {
        assert_eq!("18%".parse::<TipArg>().unwrap().0, Tip::Percent(18));
        assert_eq!(
            "3.50".parse::<TipArg>().unwrap().0,
            Tip::Custom(Money::from_cents(350))
        );
        assert!("12%".parse::<TipArg>().is_err());
        assert!("-1".parse::<TipArg>().is_err());
    }

    #[test]
    fn test_quote_with_coupon() {
        let catalog = Catalog::builtin();
        let lines = vec!["5x2".parse().unwrap()];
        let (_, breakdown) = quote(
            &catalog,
            &lines,
            OrderType::Delivery,
            Some("welcome10"),
            Tip::None,
            &PricingConfig::default(),
        )
        .unwrap();

        assert_eq!(breakdown.subtotal, Money::from_cents(4598));
        assert_eq!(breakdown.delivery_fee, Money::from_cents(599));
        assert_eq!(breakdown.discount.rounded(), Money::from_cents(460));
    }

    #[test]
    fn test_quote_unknown_item() {
        let catalog = Catalog::builtin();
        let lines = vec!["404".parse().unwrap()];
        let err = quote(
            &catalog,
            &lines,
            OrderType::Pickup,
            None,
            Tip::None,
            &PricingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::UnknownItem(404)));
    }
}
