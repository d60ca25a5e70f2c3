use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use meublerp_core::{DomainError, Entity, ValueObject};

/// Purchase order identifier, as assigned by the back-office API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(pub u64);

impl PurchaseOrderId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for PurchaseOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PurchaseOrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("PurchaseOrderId: {e}")))?;
        Ok(Self(id))
    }
}

/// One article of a supplier purchase order.
///
/// Amounts are already typed here; coercion of malformed wire values happens at
/// the API boundary. `discount_percent` is deliberately not clamped: values
/// above 100 produce a negative net price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Reference / colour code.
    pub ref_couleur: Option<String>,
    pub quantity: f64,
    /// PU HT.
    pub unit_price_excl_tax: f64,
    /// Remise, in percent (0 = no discount).
    pub discount_percent: f64,
}

impl ValueObject for LineItem {}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price_excl_tax: f64) -> Self {
        Self {
            description: description.into(),
            ref_couleur: None,
            quantity,
            unit_price_excl_tax,
            discount_percent: 0.0,
        }
    }

    pub fn with_ref_couleur(mut self, reference: impl Into<String>) -> Self {
        self.ref_couleur = Some(reference.into());
        self
    }

    pub fn with_discount(mut self, percent: f64) -> Self {
        self.discount_percent = percent;
        self
    }

    pub fn is_discounted(&self) -> bool {
        self.discount_percent > 0.0
    }
}

/// Supplier purchase order ("bon de commande fournisseur").
///
/// An immutable snapshot of what the API returned. Article order is kept for
/// display only; it has no effect on the totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SupplierPurchaseOrder {
    pub id: Option<PurchaseOrderId>,
    pub supplier: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub order_date: Option<NaiveDate>,
    /// Sequence number shown on the document ("compteur").
    pub sequence_number: Option<String>,
    pub articles: Vec<LineItem>,
    /// Avance. `None` is priced as zero.
    pub advance_payment: Option<f64>,
    /// Règlement, display only.
    pub settlement: Option<String>,
}

impl SupplierPurchaseOrder {
    pub fn new(supplier: impl Into<String>) -> Self {
        Self {
            supplier: supplier.into(),
            ..Self::default()
        }
    }

    pub fn with_article(mut self, article: LineItem) -> Self {
        self.articles.push(article);
        self
    }

    pub fn with_advance_payment(mut self, amount: f64) -> Self {
        self.advance_payment = Some(amount);
        self
    }

    /// Label used for file names and titles: the sequence number when present,
    /// else the remote id, else `"brouillon"`.
    pub fn reference(&self) -> String {
        match (&self.sequence_number, self.id) {
            (Some(seq), _) if !seq.trim().is_empty() => seq.trim().to_string(),
            (_, Some(id)) => id.to_string(),
            _ => "brouillon".to_string(),
        }
    }
}

impl Entity for SupplierPurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }
}
