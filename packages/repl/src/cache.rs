//! Session-lifetime cache of database and collection names.
//!
//! Names back tab-completion, so lookups must never block the shell twice
//! for the same list: every list is fetched at most once per session, and a
//! failed fetch caches an empty list rather than retrying.

use std::collections::HashMap;

use cosmos_client::{CosmosError, DocumentClient};

#[derive(Debug, Default)]
pub struct NameCache {
    databases: Option<Vec<String>>,
    collections_by_database: HashMap<String, Vec<String>>,
    /// Database whose collections feed `collection` completion; set on every
    /// successful `database` command.
    active_database: Option<String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Database names, fetching from the collaborator on first use.
    pub fn databases(&mut self, client: &dyn DocumentClient) -> &[String] {
        if self.databases.is_none() {
            let names = client
                .list_databases()
                .map(|dbs| dbs.into_iter().map(|d| d.id).collect())
                .unwrap_or_default();
            self.databases = Some(names);
        }
        self.databases.as_deref().unwrap_or(&[])
    }

    /// Collection names for `database`, fetching on first use.
    pub fn collections(&mut self, client: &dyn DocumentClient, database: &str) -> &[String] {
        if !self.collections_by_database.contains_key(database) {
            let names = client
                .list_collections(database)
                .map(|colls| colls.into_iter().map(|c| c.id).collect())
                .unwrap_or_default();
            self.collections_by_database
                .insert(database.to_string(), names);
        }
        self.collections_by_database
            .get(database)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Eagerly populate the collection list after a database switch and mark
    /// it active for completion. A failed fetch still caches an empty list
    /// (the at-most-once invariant holds) but reports the error so the
    /// caller can warn.
    pub fn warm_collections(
        &mut self,
        client: &dyn DocumentClient,
        database: &str,
    ) -> Result<usize, CosmosError> {
        self.active_database = Some(database.to_string());

        if let Some(names) = self.collections_by_database.get(database) {
            return Ok(names.len());
        }

        match client.list_collections(database) {
            Ok(collections) => {
                let names: Vec<String> = collections.into_iter().map(|c| c.id).collect();
                let count = names.len();
                self.collections_by_database
                    .insert(database.to_string(), names);
                Ok(count)
            }
            Err(e) => {
                self.collections_by_database
                    .insert(database.to_string(), Vec::new());
                Err(e)
            }
        }
    }

    /// Collections of the active database, for `collection` completion.
    pub fn active_collections(&mut self, client: &dyn DocumentClient) -> &[String] {
        match self.active_database.clone() {
            Some(database) => self.collections(client, &database),
            None => &[],
        }
    }
}

/// Stable, case-sensitive prefix filter used for both database and
/// collection completion.
pub fn completions_for<'a>(prefix: &str, candidates: &'a [String]) -> Vec<&'a str> {
    candidates
        .iter()
        .filter(|candidate| candidate.starts_with(prefix))
        .map(String::as_str)
        .collect()
}
