//! Shell context: the collaborator handle, the name cache, and the session
//! state, plus the query facade over them.

use std::sync::{Arc, Mutex, MutexGuard};

use cosmos_client::{CosmosError, DocumentClient, QueryOptions};

use crate::cache::NameCache;
use crate::session::{ColorMode, SelectionError, SessionState};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Local precondition: no full database+collection selection.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The collaborator rejected the query or the call failed.
    #[error(transparent)]
    Remote(#[from] CosmosError),
}

pub struct ShellContext {
    client: Arc<dyn DocumentClient>,
    cache: Arc<Mutex<NameCache>>,
    session: SessionState,
    /// Fixed at construction; cross-partition scans stay enabled for the
    /// life of the process.
    query_options: QueryOptions,
}

impl ShellContext {
    pub fn new(client: Arc<dyn DocumentClient>, color_mode: ColorMode) -> Self {
        Self {
            client,
            cache: Arc::new(Mutex::new(NameCache::new())),
            session: SessionState::new(color_mode),
            query_options: QueryOptions::default(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Shared cache handle for the completer.
    pub fn cache_handle(&self) -> Arc<Mutex<NameCache>> {
        Arc::clone(&self.cache)
    }

    /// Shared collaborator handle for the completer.
    pub fn client_handle(&self) -> Arc<dyn DocumentClient> {
        Arc::clone(&self.client)
    }

    fn cache(&self) -> MutexGuard<'_, NameCache> {
        // The shell is single-threaded; recover rather than poison-panic if
        // a completion callback ever dies mid-lock.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Select a database and eagerly warm its collection list for
    /// completion. A failed warm does not undo the selection; the returned
    /// warning lets the caller tell the user.
    pub fn select_database(&mut self, name: &str) -> Option<String> {
        self.session.select_database(name);

        match self.cache().warm_collections(self.client.as_ref(), name) {
            Ok(_) => None,
            Err(e) => Some(format!(
                "Warning: could not list collections for '{}': {}",
                name, e
            )),
        }
    }

    pub fn select_collection(&mut self, name: &str) {
        self.session.select_collection(name);
    }

    /// Run `SELECT <fragment>` against the selected collection, buffer the
    /// whole result set, and stash the pretty-printed JSON (sorted keys,
    /// 2-space indent) as the last result.
    ///
    /// A failed query leaves the previous last result in place.
    pub fn run_query(&mut self, fragment: &str) -> Result<String, QueryError> {
        let (database, collection) = {
            let (d, c) = self.session.selection()?;
            (d.to_string(), c.to_string())
        };

        let query = format!("SELECT {}", fragment);
        let documents =
            self.client
                .query_documents(&database, &collection, &query, &self.query_options)?;

        let rendered = serde_json::to_string_pretty(&documents)
            .map_err(|e| QueryError::Remote(CosmosError::Json(e)))?;
        self.session.last_result = Some(rendered.clone());
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClient;
    use serde_json::json;

    fn context_with(client: MockClient) -> (Arc<MockClient>, ShellContext) {
        let client = Arc::new(client);
        let ctx = ShellContext::new(client.clone(), ColorMode::Never);
        (client, ctx)
    }

    #[test]
    fn query_prefixes_select_and_targets_selected_path() {
        let (client, mut ctx) = context_with(
            MockClient::new()
                .with_collections("mydb", &["mycoll"])
                .with_documents(vec![json!({"id": "1", "active": true})]),
        );

        assert!(ctx.select_database("mydb").is_none());
        ctx.select_collection("mycoll");

        let rendered = ctx.run_query("* from c where c.active = true").unwrap();
        assert_eq!(
            rendered,
            "[\n  {\n    \"active\": true,\n    \"id\": \"1\"\n  }\n]"
        );
        assert_eq!(ctx.session().last_result.as_deref(), Some(rendered.as_str()));

        let queries = client.queries.lock().unwrap();
        assert_eq!(
            *queries,
            vec![(
                "mydb".to_string(),
                "mycoll".to_string(),
                "SELECT * from c where c.active = true".to_string()
            )]
        );
    }

    #[test]
    fn query_without_selection_is_local_error_and_no_network() {
        let (client, mut ctx) = context_with(MockClient::new());

        let err = ctx.run_query("1").unwrap_err();
        assert!(matches!(
            err,
            QueryError::Selection(SelectionError::Database)
        ));
        assert_eq!(client.query_count(), 0);
    }

    #[test]
    fn failed_query_leaves_last_result_unchanged() {
        let (_, mut ctx) = context_with(
            MockClient::new()
                .with_collections("mydb", &["mycoll"])
                .with_query_failure("boom"),
        );
        ctx.select_database("mydb");
        ctx.select_collection("mycoll");

        let previous = "[\n  \"kept\"\n]".to_string();
        ctx.session_mut().last_result = Some(previous.clone());

        assert!(matches!(
            ctx.run_query("* from c").unwrap_err(),
            QueryError::Remote(_)
        ));
        assert_eq!(
            ctx.session().last_result.as_deref(),
            Some(previous.as_str())
        );
    }

    #[test]
    fn sorted_keys_and_two_space_indent() {
        let (_, mut ctx) = context_with(
            MockClient::new()
                .with_collections("db", &["c"])
                .with_documents(vec![json!({"zebra": 1, "apple": 2, "mango": 3})]),
        );
        ctx.select_database("db");
        ctx.select_collection("c");

        let rendered = ctx.run_query("*").unwrap();
        let apple = rendered.find("apple").unwrap();
        let mango = rendered.find("mango").unwrap();
        let zebra = rendered.find("zebra").unwrap();
        assert!(apple < mango && mango < zebra);
        assert!(rendered.contains("\n  {"));
    }

    #[test]
    fn reselecting_database_fetches_collections_once() {
        let (client, mut ctx) =
            context_with(MockClient::new().with_collections("mydb", &["mycoll"]));

        assert!(ctx.select_database("mydb").is_none());
        assert!(ctx.select_database("mydb").is_none());

        use std::sync::atomic::Ordering;
        assert_eq!(client.list_collection_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_database_warm_surfaces_warning_but_selects() {
        let (_, mut ctx) = context_with(MockClient::new().with_list_failure());

        let warning = ctx.select_database("typo").unwrap();
        assert!(warning.contains("typo"));
        assert_eq!(ctx.session().current_database.as_deref(), Some("typo"));
    }
}
