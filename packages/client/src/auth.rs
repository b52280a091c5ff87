//! Master-key request signing for the CosmosDB REST API.
//!
//! Each request carries an `authorization` header derived from an
//! HMAC-SHA256 over the verb, resource type, resource link and the request
//! date, keyed with the base64-decoded account key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CosmosError;

type HmacSha256 = Hmac<Sha256>;

/// Decode the base64 account master key into raw signing bytes.
pub fn decode_key(account_key: &str) -> Result<Vec<u8>, CosmosError> {
    BASE64
        .decode(account_key.trim())
        .map_err(|e| CosmosError::InvalidKey {
            message: e.to_string(),
        })
}

/// Current time formatted the way the signature and the `x-ms-date` header
/// both expect (RFC 1123, GMT).
pub fn request_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Build the percent-encoded `authorization` header value for one request.
///
/// `resource_link` is the path of the addressed resource without a leading
/// slash, e.g. `dbs/mydb/colls/mycoll` (empty for account-level listings).
pub fn authorization(
    key: &[u8],
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> Result<String, CosmosError> {
    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type.to_lowercase(),
        resource_link,
        date.to_lowercase()
    );

    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| CosmosError::InvalidKey {
        message: e.to_string(),
    })?;
    mac.update(payload.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let token = format!("type=master&ver=1.0&sig={}", signature);
    Ok(url::form_urlencoded::byte_serialize(token.as_bytes()).collect())
}
