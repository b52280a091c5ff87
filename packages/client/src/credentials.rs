//! Account credentials, read once at startup.

use crate::error::CosmosError;

/// Environment variable holding the account endpoint URL.
pub const ENDPOINT_VAR: &str = "COSMOS_ENDPOINT";

/// Environment variable holding the base64 master key.
pub const ACCOUNT_KEY_VAR: &str = "COSMOS_ACCOUNT_KEY";

/// Endpoint URL and master key for one CosmosDB account.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub endpoint: String,
    pub account_key: String,
}

impl Credentials {
    pub fn new(endpoint: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            account_key: account_key.into(),
        }
    }

    /// Read both values from the environment. Missing either is a
    /// configuration error naming the two required variables.
    pub fn from_env() -> Result<Self, CosmosError> {
        match (
            std::env::var(ENDPOINT_VAR),
            std::env::var(ACCOUNT_KEY_VAR),
        ) {
            (Ok(endpoint), Ok(account_key)) => Ok(Self::new(endpoint, account_key)),
            _ => Err(CosmosError::Config {
                message: format!(
                    "Set {} and {} in the environment.",
                    ENDPOINT_VAR, ACCOUNT_KEY_VAR
                ),
            }),
        }
    }
}
