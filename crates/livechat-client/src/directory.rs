//! Customer details over HTTP.

use livechat_proto::{CustomerDetails, CustomerId};
use thiserror::Error;

/// Errors fetching customer details.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body is not a customer details document.
    #[error("invalid customer details: {0}")]
    Decode(String),
}

/// Client for the backend's user-details endpoint.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectory {
    /// Directory rooted at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: reqwest::Client::new(), base_url }
    }

    /// Full URL of a customer's details.
    pub fn url(&self, customer_id: CustomerId) -> String {
        format!("{}{}", self.base_url, CustomerDetails::path(customer_id))
    }

    /// Fetch a customer's details.
    pub async fn fetch(&self, customer_id: CustomerId) -> Result<CustomerDetails, DirectoryError> {
        let response = self
            .client
            .get(self.url(customer_id))
            .send()
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| DirectoryError::Request(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}
