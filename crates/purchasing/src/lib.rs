//! Purchasing domain module (supplier purchase orders, "bons de commande fournisseur").
//!
//! This crate holds the purchase-order value types and the pricing engine that
//! every presentation surface (screen view, spreadsheet, print) calls. It is
//! pure, deterministic domain logic (no IO, no HTTP, no rendering).

pub mod order;
pub mod pricing;

pub use order::{LineItem, PurchaseOrderId, SupplierPurchaseOrder};
pub use pricing::{
    DocumentPricing, LinePricing, TOTAL_DECIMALS, VAT_RATE, has_discount, price_document,
    price_line, round_to, sum_then_round,
};
