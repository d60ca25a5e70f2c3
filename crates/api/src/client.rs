//! REST client for the back-office API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use meublerp_purchasing::{PurchaseOrderId, SupplierPurchaseOrder};

use crate::decode::{DecodePolicy, Decoded, decode_purchase_order, decode_purchase_orders};
use crate::dto::PurchaseOrderPayload;
use crate::errors::ApiError;

/// Resource path of supplier purchase orders, relative to the base URL.
pub const PURCHASE_ORDERS_PATH: &str = "bons-commande-fournisseur";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiClientConfig {
    pub base_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    pub policy: DecodePolicy,
    pub timeout: Duration,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            policy: DecodePolicy::default(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Thin typed client: every response goes through the decoder before it is
/// returned.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiClientConfig,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// `GET {base}/bons-commande-fournisseur/{id}`
    pub async fn fetch_purchase_order(
        &self,
        id: PurchaseOrderId,
    ) -> Result<SupplierPurchaseOrder, ApiError> {
        let payload: PurchaseOrderPayload = self
            .get_json(&format!("{PURCHASE_ORDERS_PATH}/{id}"))
            .await?;
        let decoded = decode_purchase_order(payload, self.config.policy)?;
        let mut order = decoded.value;
        // Some endpoints omit the id on single-resource reads.
        order.id.get_or_insert(id);
        Ok(order)
    }

    /// `GET {base}/bons-commande-fournisseur`
    pub async fn list_purchase_orders(&self) -> Result<Vec<SupplierPurchaseOrder>, ApiError> {
        let entries: Vec<Value> = self.get_json(PURCHASE_ORDERS_PATH).await?;
        tracing::debug!(count = entries.len(), "fetched purchase orders");

        decode_purchase_orders(entries, self.config.policy).map(Decoded::into_value)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
