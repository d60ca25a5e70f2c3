//! `meublerp-api`: boundary with the back-office REST API.
//!
//! Payloads are decoded into typed domain values here, so that downstream code
//! (pricing, rendering) never sees raw JSON.

pub mod client;
pub mod decode;
pub mod dto;
pub mod errors;

pub use client::{ApiClient, ApiClientConfig, PURCHASE_ORDERS_PATH};
pub use decode::{
    DecodePolicy, Decoded, FieldIssue, decode_purchase_order, decode_purchase_order_json,
    decode_purchase_orders, decode_purchase_orders_json,
};
pub use dto::{ArticlePayload, PurchaseOrderPayload};
pub use errors::ApiError;
