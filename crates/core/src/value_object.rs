//! Value object trait: equality by value, not identity.
//!
//! Line items and computed price breakdowns have **no identity**: two lines
//! with the same description, quantity and prices are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Pricing works on
/// snapshots of them, so the same input always yields the same figures.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: `LineItem { description: "Chaise", quantity: 4.0, .. }`
/// - **Entity**: `SupplierPurchaseOrder { id: Some(PurchaseOrderId(12)), .. }`
///
/// Monetary fields are `f64`, so implementors only require `PartialEq`.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
