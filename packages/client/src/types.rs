use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A database entry from the account listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseMeta {
    pub id: String,
}

/// A collection entry from a database listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub id: String,
}

/// Per-query execution flags, fixed at shell construction.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Allow the server to fan the query out across partitions.
    pub enable_cross_partition: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enable_cross_partition: true,
        }
    }
}

/// Response envelope for `GET /dbs`.
#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseListResponse {
    #[serde(rename = "Databases", default)]
    pub databases: Vec<DatabaseMeta>,
}

/// Response envelope for `GET /dbs/{db}/colls`.
#[derive(Debug, Deserialize)]
pub(crate) struct CollectionListResponse {
    #[serde(rename = "DocumentCollections", default)]
    pub collections: Vec<CollectionMeta>,
}

/// Response envelope for `POST /dbs/{db}/colls/{coll}/docs`.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(rename = "Documents", default)]
    pub documents: Vec<JsonValue>,
}

/// Query request body for the SQL API.
#[derive(Debug, Serialize)]
pub(crate) struct QueryBody<'a> {
    pub query: &'a str,
    pub parameters: Vec<JsonValue>,
}
