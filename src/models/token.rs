use serde::{Deserialize, Serialize};

/// Body returned by `/login` and `/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds from issuance.
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
