//! Wire shapes of the back-office API (French field names, loosely typed).
//!
//! Every field is kept as a raw JSON value: the API sends numbers as numbers or
//! as strings typed into forms (`"12,5"`, `""`), and older records carry numbers
//! where text is expected. Interpreting them is the job of [`crate::decode`], so
//! that one odd field never makes the whole order unreadable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderPayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub fournisseur: Option<Value>,
    #[serde(default)]
    pub adresse: Option<Value>,
    #[serde(default)]
    pub gsm: Option<Value>,
    #[serde(default)]
    pub date_bon: Option<Value>,
    #[serde(default)]
    pub compteur: Option<Value>,
    /// Decoded entry by entry into [`ArticlePayload`]s.
    #[serde(default)]
    pub articles: Option<Value>,
    #[serde(default)]
    pub avance: Option<Value>,
    #[serde(default)]
    pub reglement: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticlePayload {
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub ref_couleur: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub pu_ht: Option<Value>,
    /// Remise in percent.
    #[serde(default)]
    pub pht: Option<Value>,
}
