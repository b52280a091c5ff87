use serde_json::Value as JsonValue;

#[derive(thiserror::Error, Debug)]
pub enum CosmosError {
    #[error("{message}")]
    Config { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid account key: {message}")]
    InvalidKey { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server rejected a request. `body` is the raw response payload;
    /// [`CosmosError::server_message`] digs the human-readable reason out of
    /// it when the payload has the expected shape.
    #[error("request failed with status {status}: {body}")]
    Request { status: u16, body: String },
}

impl CosmosError {
    /// Best-effort extraction of the server-side error message from a
    /// request failure. Returns `None` for any other variant or any payload
    /// that does not match the doubly-encoded shape CosmosDB uses.
    pub fn server_message(&self) -> Option<String> {
        match self {
            CosmosError::Request { body, .. } => unwrap_server_message(body),
            _ => None,
        }
    }
}

/// CosmosDB wraps query rejections twice: the response body is a JSON object
/// whose `message` field holds `Message: <json>\r\nActivityId: ...`, and the
/// inner JSON carries an `errors` array. Each step is allowed to fail;
/// callers fall back to the raw body when this returns `None`.
fn unwrap_server_message(body: &str) -> Option<String> {
    let envelope: JsonValue = serde_json::from_str(body).ok()?;
    let message = envelope.get("message")?.as_str()?;
    let first_line = message.split('\r').next()?;
    let inner = first_line.strip_prefix("Message: ")?;
    let parsed: JsonValue = serde_json::from_str(inner).ok()?;
    let text = parsed.get("errors")?.get(0)?.get("message")?.as_str()?;
    Some(text.to_string())
}
