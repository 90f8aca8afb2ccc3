//! Customer profile served by the backend's user-details endpoint.

use serde::{Deserialize, Serialize};

use crate::CustomerId;

/// Response body of `GET /api/user_details/{customer_id}`.
///
/// Every field is optional: the backend leaves unknown profile fields null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Full legal name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Account tier.
    #[serde(default)]
    pub account_tier: Option<String>,
    /// Sign-up date (`YYYY-MM-DD`).
    #[serde(default)]
    pub date_joined: Option<String>,
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

impl CustomerDetails {
    /// Path of the endpoint serving a customer's details.
    pub fn path(customer_id: CustomerId) -> String {
        format!("/api/user_details/{customer_id}")
    }

    /// Labelled rows for display, with fallbacks for missing fields.
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        [
            ("Username", or_na(&self.username)),
            ("Full Name", or_na(&self.full_name)),
            ("Email", or_na(&self.email)),
            ("Phone", or_na(&self.phone_number)),
            ("Account Tier", self.account_tier.as_deref().unwrap_or("Standard")),
            ("Member Since", or_na(&self.date_joined)),
        ]
    }
}
