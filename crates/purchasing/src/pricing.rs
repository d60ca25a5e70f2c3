//! Pricing engine for supplier purchase orders.
//!
//! Every surface that shows money for a purchase order (screen view, spreadsheet
//! export, print export) goes through [`price_document`], so the figures they
//! show cannot drift apart.
//!
//! Per line:
//!
//! ```text
//! remise        = pu_ht * remise% / 100
//! pu_ht_net     = pu_ht - remise
//! tva           = pu_ht_net * 0.19
//! pu_ttc        = pu_ht_net * 1.19
//! total_ttc     = pu_ttc * quantity
//! ```
//!
//! The document total is the sum of the unrounded line totals, rounded once to
//! [`TOTAL_DECIMALS`] places. The balance due is rounded the same way.

use serde::{Deserialize, Serialize};

use meublerp_core::ValueObject;

use crate::order::{LineItem, SupplierPurchaseOrder};

/// TVA rate applied to every line. Fixed for this domain.
pub const VAT_RATE: f64 = 0.19;

/// Decimal places kept on document-level figures.
pub const TOTAL_DECIMALS: u32 = 4;

/// Figures derived for one article.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePricing {
    pub quantity: f64,
    pub unit_price_excl_tax: f64,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub net_unit_price_excl_tax: f64,
    pub vat_amount: f64,
    pub unit_price_incl_tax: f64,
    pub line_total_incl_tax: f64,
}

impl ValueObject for LinePricing {}

impl LinePricing {
    /// A discount above 100% turns the net price negative. This is kept as-is
    /// (it may model a rebate) but callers can surface it.
    pub fn is_negative_net(&self) -> bool {
        self.net_unit_price_excl_tax < 0.0
    }
}

/// Figures derived for a whole purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPricing {
    pub lines: Vec<LinePricing>,
    pub total_incl_tax: f64,
    pub advance_payment: f64,
    pub balance_due: f64,
    pub has_discount: bool,
}

impl ValueObject for DocumentPricing {}

/// Price a single article.
pub fn price_line(item: &LineItem) -> LinePricing {
    let quantity = finite_or_zero(item.quantity);
    let unit_price_excl_tax = finite_or_zero(item.unit_price_excl_tax);
    let discount_percent = finite_or_zero(item.discount_percent);

    let discount_amount = unit_price_excl_tax * discount_percent / 100.0;
    let net_unit_price_excl_tax = unit_price_excl_tax - discount_amount;
    let vat_amount = net_unit_price_excl_tax * VAT_RATE;
    let unit_price_incl_tax = net_unit_price_excl_tax * (1.0 + VAT_RATE);
    let line_total_incl_tax = unit_price_incl_tax * quantity;

    LinePricing {
        quantity,
        unit_price_excl_tax,
        discount_percent,
        discount_amount,
        net_unit_price_excl_tax,
        vat_amount,
        unit_price_incl_tax,
        line_total_incl_tax,
    }
}

/// Price a whole purchase order. Never fails.
pub fn price_document(order: &SupplierPurchaseOrder) -> DocumentPricing {
    let lines: Vec<LinePricing> = order.articles.iter().map(price_line).collect();

    for (idx, line) in lines.iter().enumerate() {
        if line.is_negative_net() {
            tracing::warn!(
                order = %order.reference(),
                line = idx,
                discount_percent = line.discount_percent,
                "discount above 100% yields a negative net unit price"
            );
        }
    }

    let total_incl_tax = sum_then_round(lines.iter().map(|l| l.line_total_incl_tax));
    let advance_payment = finite_or_zero(order.advance_payment.unwrap_or(0.0));
    let balance_due = round_to(total_incl_tax - advance_payment, TOTAL_DECIMALS);

    DocumentPricing {
        lines,
        total_incl_tax,
        advance_payment,
        balance_due,
        has_discount: has_discount(&order.articles),
    }
}

/// Whether discount columns should be shown: at least one article has a
/// discount strictly above zero.
pub fn has_discount(articles: &[LineItem]) -> bool {
    articles.iter().any(LineItem::is_discounted)
}

/// Sum at full precision, then round once to [`TOTAL_DECIMALS`].
pub fn sum_then_round(values: impl IntoIterator<Item = f64>) -> f64 {
    let total: f64 = values.into_iter().map(finite_or_zero).sum();
    round_to(total, TOTAL_DECIMALS)
}

/// Round half toward positive infinity to `decimals` places
/// (`floor(x * 10^d + 0.5) / 10^d`), the rounding the back-office front-end
/// has always applied. Negative zero is normalized to zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor + 0.5).floor() / factor;
    // `value * factor` overflows for magnitudes near f64::MAX.
    if rounded == 0.0 || !rounded.is_finite() {
        0.0
    } else {
        rounded
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn order_with(articles: Vec<LineItem>) -> SupplierPurchaseOrder {
        SupplierPurchaseOrder {
            articles,
            ..SupplierPurchaseOrder::new("Atelier Bois Massif")
        }
    }

    #[test]
    fn empty_order_totals_zero() {
        let pricing = price_document(&order_with(Vec::new()));

        assert_eq!(pricing.total_incl_tax, 0.0);
        assert_eq!(pricing.balance_due, 0.0);
        assert!(pricing.lines.is_empty());
        assert!(!pricing.has_discount);
    }

    #[test]
    fn single_line_without_discount() {
        let line = price_line(&LineItem::new("Chaise hêtre", 2.0, 100.0));

        assert_close(line.discount_amount, 0.0);
        assert_close(line.net_unit_price_excl_tax, 100.0);
        assert_close(line.vat_amount, 19.0);
        assert_close(line.unit_price_incl_tax, 119.0);
        assert_close(line.line_total_incl_tax, 238.0);

        let pricing = price_document(&order_with(vec![LineItem::new("Chaise hêtre", 2.0, 100.0)]));
        assert_eq!(pricing.total_incl_tax, 238.0);
    }

    #[test]
    fn single_line_with_discount() {
        let line = price_line(&LineItem::new("Buffet", 1.0, 200.0).with_discount(10.0));

        assert_close(line.discount_amount, 20.0);
        assert_close(line.net_unit_price_excl_tax, 180.0);
        assert_close(line.vat_amount, 34.2);
        assert_close(line.unit_price_incl_tax, 214.2);
        assert_close(line.line_total_incl_tax, 214.2);
    }

    #[test]
    fn total_is_rounded_once_after_summation() {
        assert_eq!(sum_then_round([33.33335, 33.33335]), 66.6667);

        let summed_first = sum_then_round([0.11115, 0.11115]);
        let rounded_first =
            round_to(0.11115, TOTAL_DECIMALS) + round_to(0.11115, TOTAL_DECIMALS);
        assert_eq!(summed_first, 0.2223);
        assert_ne!(summed_first, rounded_first);
    }

    #[test]
    fn balance_due_subtracts_advance() {
        // 420.2718 * 1.19 = 500.123442 -> 500.1234 after rounding.
        let order = order_with(vec![LineItem::new("Armoire", 1.0, 420.2718)])
            .with_advance_payment(200.0);
        let pricing = price_document(&order);

        assert_eq!(pricing.total_incl_tax, 500.1234);
        assert_eq!(pricing.advance_payment, 200.0);
        assert_eq!(pricing.balance_due, 300.1234);
    }

    #[test]
    fn missing_advance_means_balance_equals_total() {
        let pricing = price_document(&order_with(vec![LineItem::new("Lit", 1.0, 300.0)]));

        assert_eq!(pricing.advance_payment, 0.0);
        assert_eq!(pricing.balance_due, pricing.total_incl_tax);
    }

    #[test]
    fn non_finite_inputs_price_as_zero() {
        let item = LineItem {
            quantity: f64::NAN,
            ..LineItem::new("Commode", 0.0, 150.0)
        };
        let line = price_line(&item);

        assert_eq!(line.line_total_incl_tax, 0.0);
        assert!(!line.line_total_incl_tax.is_nan());

        let mut order = order_with(vec![item]);
        order.advance_payment = Some(f64::INFINITY);
        let pricing = price_document(&order);
        assert_eq!(pricing.total_incl_tax, 0.0);
        assert_eq!(pricing.balance_due, 0.0);
    }

    #[test]
    fn has_discount_requires_a_positive_discount() {
        let plain = vec![
            LineItem::new("Table", 1.0, 500.0),
            LineItem::new("Banc", 2.0, 120.0),
        ];
        assert!(!has_discount(&plain));

        let mut mixed = plain.clone();
        mixed.push(LineItem::new("Tabouret", 4.0, 45.0).with_discount(15.0));
        assert!(has_discount(&mixed));

        let negative = vec![LineItem::new("Étagère", 1.0, 60.0).with_discount(-5.0)];
        assert!(!has_discount(&negative));
    }

    #[test]
    fn discount_above_hundred_is_kept_and_flagged() {
        let line = price_line(&LineItem::new("Avoir fournisseur", 1.0, 100.0).with_discount(150.0));

        assert_close(line.net_unit_price_excl_tax, -50.0);
        assert_close(line.line_total_incl_tax, -59.5);
        assert!(line.is_negative_net());
    }

    #[test]
    fn round_to_matches_half_up_rule() {
        assert_eq!(round_to(1.00005, 4), 1.0001);
        assert_eq!(round_to(-0.00004, 4), 0.0);
        assert!(round_to(-0.00004, 4).is_sign_positive());
        assert_eq!(round_to(f64::NAN, 4), 0.0);
        assert_eq!(round_to(2.345, 2), 2.35);
    }

    #[test]
    fn round_to_never_returns_infinity() {
        assert_eq!(round_to(1e305, 4), 0.0);
        assert_eq!(round_to(-1e305, 4), 0.0);
        assert_eq!(round_to(f64::MAX, 0), f64::MAX);
        assert_eq!(sum_then_round([f64::MAX, f64::MAX]), 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: article order never changes the document total.
        #[test]
        fn total_is_independent_of_article_order(
            lines in prop::collection::vec((0u32..50, 0u32..1_000_000, 0u32..100), 0..12)
        ) {
            let articles: Vec<LineItem> = lines
                .iter()
                .map(|(qty, cents, pct)| {
                    LineItem::new("article", *qty as f64, *cents as f64 / 100.0)
                        .with_discount(*pct as f64)
                })
                .collect();

            let mut reversed = articles.clone();
            reversed.reverse();

            let forward = price_document(&order_with(articles));
            let backward = price_document(&order_with(reversed));

            prop_assert!((forward.total_incl_tax - backward.total_incl_tax).abs() < 1e-4);
            prop_assert_eq!(forward.has_discount, backward.has_discount);
        }

        /// Property: the balance plus the advance gives back the total.
        #[test]
        fn balance_plus_advance_is_total(
            qty in 0u32..100,
            cents in 0u32..10_000_000,
            advance_cents in 0u32..10_000_000
        ) {
            let order = order_with(vec![LineItem::new("article", qty as f64, cents as f64 / 100.0)])
                .with_advance_payment(advance_cents as f64 / 100.0);
            let pricing = price_document(&order);

            prop_assert!(
                (pricing.balance_due + pricing.advance_payment - pricing.total_incl_tax).abs() < 1e-3
            );
            prop_assert!(pricing.total_incl_tax.is_finite());
        }
    }
}
