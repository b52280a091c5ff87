//! Per-session shell state: the selected database/collection pair, the last
//! query result, and the output/color modes.

use std::io::IsTerminal;

/// Where query output goes by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Pipe through the pager when the terminal allows it.
    #[default]
    Paged,
    /// Write straight to stdout.
    Plain,
}

/// Whether ANSI styling is applied to prompt and output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    Never,
    Always,
}

/// A query or export was attempted without a full database+collection
/// selection. Messages name the command that fixes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Use \"database <database_name>\" to select CosmosDB database")]
    Database,
    #[error("Use \"collection <collection_name>\" to select CosmosDB collection")]
    Collection,
}

/// Mutable state owned by the shell instance for the life of the process.
#[derive(Debug, Default)]
pub struct SessionState {
    pub current_database: Option<String>,
    pub current_collection: Option<String>,
    /// Serialized JSON of the last successful query, kept for `export`.
    pub last_result: Option<String>,
    pub output_mode: OutputMode,
    pub color_mode: ColorMode,
}

impl SessionState {
    pub fn new(color_mode: ColorMode) -> Self {
        Self {
            color_mode,
            ..Self::default()
        }
    }

    /// Select a database, dropping any collection selected under the
    /// previous one.
    pub fn select_database(&mut self, name: &str) {
        self.current_database = Some(name.to_string());
        self.current_collection = None;
    }

    /// Select a collection. The name is not validated here; an unknown
    /// collection fails naturally at query time.
    pub fn select_collection(&mut self, name: &str) {
        self.current_collection = Some(name.to_string());
    }

    /// The selected (database, collection) pair, or which selection is
    /// missing.
    pub fn selection(&self) -> Result<(&str, &str), SelectionError> {
        let database = self
            .current_database
            .as_deref()
            .ok_or(SelectionError::Database)?;
        let collection = self
            .current_collection
            .as_deref()
            .ok_or(SelectionError::Collection)?;
        Ok((database, collection))
    }

    /// The two-segment collection path. With `strict` both selections must
    /// be present; otherwise a best-effort partial path for prompt display.
    pub fn collection_path(&self, strict: bool) -> Result<String, SelectionError> {
        if strict {
            let (database, collection) = self.selection()?;
            return Ok(format!("/dbs/{}/colls/{}", database, collection));
        }

        Ok(match (&self.current_database, &self.current_collection) {
            (None, _) => String::new(),
            (Some(database), None) => format!("/dbs/{}/colls/", database),
            (Some(database), Some(collection)) => {
                format!("/dbs/{}/colls/{}", database, collection)
            }
        })
    }

    /// Best-effort path for the prompt; never fails.
    pub fn display_path(&self) -> String {
        self.collection_path(false).unwrap_or_default()
    }

    /// Whether output and prompt may carry ANSI styling right now.
    pub fn colorize(&self) -> bool {
        match self.color_mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}
