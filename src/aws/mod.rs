use chrono::{DateTime, Utc};
use serde::Deserialize;

pub mod credentials;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod roles;
pub mod sso;
pub mod sts;

/// AWS temporary credentials structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

// Re-export commonly used types (functions should be accessed via module path)
pub use roles::{AccountId, RoleArn};
pub use sts::CallerIdentity;
