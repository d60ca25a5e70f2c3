//! Typed decoding of purchase-order payloads.
//!
//! Two policies:
//!
//! - [`DecodePolicy::Lenient`] keeps the historical behavior of the back-office
//!   forms: a numeric field that cannot be read counts as `0`. Every such
//!   coercion is recorded as a [`FieldIssue`] and logged.
//! - [`DecodePolicy::Strict`] rejects the payload instead, listing every
//!   malformed field.
//!
//! Absent values (missing key, `null`, empty string) are not issues: they are
//! what a partially filled form looks like, and they decode to zero / `None`.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use meublerp_purchasing::{LineItem, PurchaseOrderId, SupplierPurchaseOrder};

use crate::dto::{ArticlePayload, PurchaseOrderPayload};
use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    #[default]
    Lenient,
    Strict,
}

/// A field whose raw value could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Path of the field, e.g. `articles[2].quantity`.
    pub field: String,
    /// The raw JSON value, as sent.
    pub raw: String,
    pub reason: &'static str,
}

impl core::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {} (got {})", self.field, self.reason, self.raw)
    }
}

/// A decoded value together with the coercions applied to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub issues: Vec<FieldIssue>,
}

impl<T> Decoded<T> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Decode one purchase order payload.
pub fn decode_purchase_order(
    payload: PurchaseOrderPayload,
    policy: DecodePolicy,
) -> Result<Decoded<SupplierPurchaseOrder>, ApiError> {
    let mut decoder = FieldDecoder::default();
    let order = decoder.purchase_order(payload, "");
    decoder.finish(order, policy)
}

/// Decode one purchase order from a JSON document.
pub fn decode_purchase_order_json(
    json: &str,
    policy: DecodePolicy,
) -> Result<Decoded<SupplierPurchaseOrder>, ApiError> {
    let payload: PurchaseOrderPayload = serde_json::from_str(json)?;
    decode_purchase_order(payload, policy)
}

/// Decode a JSON array of purchase orders. Issue paths are prefixed with the
/// index of the order (`[3].articles[0].pu_ht`).
pub fn decode_purchase_orders_json(
    json: &str,
    policy: DecodePolicy,
) -> Result<Decoded<Vec<SupplierPurchaseOrder>>, ApiError> {
    let entries: Vec<Value> = serde_json::from_str(json)?;
    decode_purchase_orders(entries, policy)
}

/// Decode the entries of a purchase order list. Entries that are not JSON
/// objects are dropped and reported as issues.
pub fn decode_purchase_orders(
    entries: Vec<Value>,
    policy: DecodePolicy,
) -> Result<Decoded<Vec<SupplierPurchaseOrder>>, ApiError> {
    let mut decoder = FieldDecoder::default();
    let orders = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let prefix = format!("[{idx}]");
            decoder
                .object::<PurchaseOrderPayload>(entry, &prefix, "not a purchase order")
                .map(|payload| decoder.purchase_order(payload, &format!("{prefix}.")))
        })
        .collect();
    decoder.finish(orders, policy)
}

#[derive(Debug, Default)]
struct FieldDecoder {
    issues: Vec<FieldIssue>,
}

impl FieldDecoder {
    fn finish<T>(self, value: T, policy: DecodePolicy) -> Result<Decoded<T>, ApiError> {
        if self.issues.is_empty() {
            return Ok(Decoded {
                value,
                issues: self.issues,
            });
        }

        match policy {
            DecodePolicy::Strict => Err(ApiError::InvalidPayload {
                issues: self.issues,
            }),
            DecodePolicy::Lenient => {
                for issue in &self.issues {
                    tracing::warn!(
                        field = %issue.field,
                        raw = %issue.raw,
                        reason = issue.reason,
                        "coerced malformed field"
                    );
                }
                Ok(Decoded {
                    value,
                    issues: self.issues,
                })
            }
        }
    }

    fn purchase_order(&mut self, payload: PurchaseOrderPayload, prefix: &str) -> SupplierPurchaseOrder {
        let articles = self.articles(payload.articles, prefix);

        SupplierPurchaseOrder {
            id: self.id(payload.id.as_ref(), &format!("{prefix}id")),
            supplier: self
                .label(payload.fournisseur.as_ref(), &format!("{prefix}fournisseur"))
                .unwrap_or_default(),
            address: self.label(payload.adresse.as_ref(), &format!("{prefix}adresse")),
            phone: self.code(payload.gsm.as_ref(), &format!("{prefix}gsm")),
            order_date: self.date(payload.date_bon.as_ref(), &format!("{prefix}date_bon")),
            sequence_number: self.code(payload.compteur.as_ref(), &format!("{prefix}compteur")),
            articles,
            advance_payment: self.optional_number(payload.avance.as_ref(), &format!("{prefix}avance")),
            settlement: self.code(payload.reglement.as_ref(), &format!("{prefix}reglement")),
        }
    }

    /// Entries that are not objects (`null` included) are dropped with an issue.
    fn articles(&mut self, value: Option<Value>, prefix: &str) -> Vec<LineItem> {
        let field = format!("{prefix}articles");
        let entries = match value {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                self.issue(&field, &other, "not a list of articles");
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let path = format!("{field}[{idx}]");
                self.object::<ArticlePayload>(entry, &path, "not an article")
                    .map(|article| self.article(article, &format!("{path}.")))
            })
            .collect()
    }

    fn article(&mut self, payload: ArticlePayload, prefix: &str) -> LineItem {
        LineItem {
            description: self
                .label(payload.description.as_ref(), &format!("{prefix}description"))
                .unwrap_or_default(),
            ref_couleur: self.code(payload.ref_couleur.as_ref(), &format!("{prefix}ref_couleur")),
            quantity: self.number(payload.quantity.as_ref(), &format!("{prefix}quantity")),
            unit_price_excl_tax: self.number(payload.pu_ht.as_ref(), &format!("{prefix}pu_ht")),
            discount_percent: self.number(payload.pht.as_ref(), &format!("{prefix}pht")),
        }
    }

    fn object<T: DeserializeOwned>(&mut self, value: Value, field: &str, reason: &'static str) -> Option<T> {
        if !value.is_object() {
            self.issue(field, &value, reason);
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(payload) => Some(payload),
            Err(_) => {
                self.issue(field, &value, reason);
                None
            }
        }
    }

    /// Free text such as a name or an address. Numbers and booleans are kept in
    /// their JSON spelling but reported; anything else is dropped.
    fn label(&mut self, value: Option<&Value>, field: &str) -> Option<String> {
        match value? {
            Value::Null => None,
            Value::String(s) => non_blank(s),
            other @ (Value::Number(_) | Value::Bool(_)) => {
                self.issue(field, other, "not text");
                Some(other.to_string())
            }
            other => {
                self.issue(field, other, "not text");
                None
            }
        }
    }

    /// Text that is commonly typed as a number: phone, sequence, colour code.
    fn code(&mut self, value: Option<&Value>, field: &str) -> Option<String> {
        match value? {
            Value::Null => None,
            Value::String(s) => non_blank(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                self.issue(field, other, "not text");
                None
            }
        }
    }

    fn number(&mut self, value: Option<&Value>, field: &str) -> f64 {
        self.optional_number(value, field).unwrap_or(0.0)
    }

    /// `None` when absent, `Some(0.0)` when malformed (plus an issue).
    fn optional_number(&mut self, value: Option<&Value>, field: &str) -> Option<f64> {
        let value = value?;
        match value {
            Value::Null => None,
            Value::Number(n) => match n.as_f64() {
                Some(v) if v.is_finite() => Some(v),
                _ => Some(self.reject(field, value, "number out of range")),
            },
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => match parse_decimal(s) {
                Some(v) => Some(v),
                None => Some(self.reject(field, value, "not a number")),
            },
            _ => Some(self.reject(field, value, "not a number")),
        }
    }

    fn id(&mut self, value: Option<&Value>, field: &str) -> Option<PurchaseOrderId> {
        let value = value?;
        let parsed = match value {
            Value::Null => return None,
            Value::Number(n) => n.as_u64().map(PurchaseOrderId),
            Value::String(s) => s.parse::<PurchaseOrderId>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.reject(field, value, "not a purchase order id");
        }
        parsed
    }

    fn date(&mut self, value: Option<&Value>, field: &str) -> Option<NaiveDate> {
        let raw = match value? {
            Value::Null => return None,
            Value::String(s) => s.trim(),
            other => {
                self.issue(field, other, "not a date");
                return None;
            }
        };
        if raw.is_empty() {
            return None;
        }
        // Accepts plain dates and ISO timestamps ("2024-03-18T00:00:00.000Z").
        let day = raw.get(..10).unwrap_or(raw);
        match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.issue(field, &Value::String(raw.to_string()), "not a date");
                None
            }
        }
    }

    fn reject(&mut self, field: &str, raw: &Value, reason: &'static str) -> f64 {
        self.issue(field, raw, reason);
        0.0
    }

    fn issue(&mut self, field: &str, raw: &Value, reason: &'static str) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            raw: raw.to_string(),
            reason,
        });
    }
}

/// Parse a decimal typed by a person: surrounding blanks, grouping spaces and a
/// decimal comma are accepted. Non-finite results are refused.
fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
