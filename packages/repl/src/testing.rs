//! Shared test doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use cosmos_client::{CollectionMeta, CosmosError, DatabaseMeta, DocumentClient, QueryOptions};
use serde_json::Value as JsonValue;

/// Counting in-memory collaborator.
#[derive(Default)]
pub struct MockClient {
    databases: Vec<String>,
    collections: HashMap<String, Vec<String>>,
    documents: Vec<JsonValue>,
    fail_lists: bool,
    fail_query_body: Option<String>,
    pub list_database_calls: AtomicUsize,
    pub list_collection_calls: AtomicUsize,
    /// (database, collection, query) per query_documents call.
    pub queries: Mutex<Vec<(String, String, String)>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_databases(mut self, names: &[&str]) -> Self {
        self.databases = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_collections(mut self, database: &str, names: &[&str]) -> Self {
        self.collections.insert(
            database.to_string(),
            names.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_documents(mut self, documents: Vec<JsonValue>) -> Self {
        self.documents = documents;
        self
    }

    /// Make both list operations fail.
    pub fn with_list_failure(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    /// Make queries fail with a 400 carrying `body`.
    pub fn with_query_failure(mut self, body: &str) -> Self {
        self.fail_query_body = Some(body.to_string());
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl DocumentClient for MockClient {
    fn list_databases(&self) -> Result<Vec<DatabaseMeta>, CosmosError> {
        self.list_database_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists {
            return Err(CosmosError::Request {
                status: 404,
                body: "not found".into(),
            });
        }
        Ok(self
            .databases
            .iter()
            .map(|id| DatabaseMeta { id: id.clone() })
            .collect())
    }

    fn list_collections(&self, database: &str) -> Result<Vec<CollectionMeta>, CosmosError> {
        self.list_collection_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists {
            return Err(CosmosError::Request {
                status: 404,
                body: "not found".into(),
            });
        }
        Ok(self
            .collections
            .get(database)
            .into_iter()
            .flatten()
            .map(|id| CollectionMeta { id: id.clone() })
            .collect())
    }

    fn query_documents(
        &self,
        database: &str,
        collection: &str,
        query: &str,
        _options: &QueryOptions,
    ) -> Result<Vec<JsonValue>, CosmosError> {
        self.queries.lock().unwrap().push((
            database.to_string(),
            collection.to_string(),
            query.to_string(),
        ));
        if let Some(body) = &self.fail_query_body {
            return Err(CosmosError::Request {
                status: 400,
                body: body.clone(),
            });
        }
        Ok(self.documents.clone())
    }
}
