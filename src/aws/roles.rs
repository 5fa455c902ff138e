use serde::Deserialize;
use std::fmt;

/// AWS account identifier as reported by `sts get-caller-identity`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ARN of an assumable IAM role, `arn:aws:iam::{account}:role/{name}`.
///
/// Built fresh for every assumption and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleArn(String);

impl RoleArn {
    /// Build the role ARN for `role_name` in `account`.
    pub fn new(account: &AccountId, role_name: &str) -> Self {
        Self(format!("arn:aws:iam::{account}:role/{role_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract role name from ARN (arn:aws:iam::123456789012:role/RoleName)
    pub fn role_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for RoleArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
