//! Tab completion for commands and live database/collection names.

use std::sync::{Arc, Mutex};

use cosmos_client::DocumentClient;
use reedline::{Completer, Span, Suggestion};

use crate::cache::{completions_for, NameCache};
use crate::commands::Command;

/// Completer backed by the shared name cache. Name lists are fetched from
/// the server on first use and reused for the rest of the session.
pub struct ShellCompleter {
    client: Arc<dyn DocumentClient>,
    cache: Arc<Mutex<NameCache>>,
}

impl ShellCompleter {
    pub fn new(client: Arc<dyn DocumentClient>, cache: Arc<Mutex<NameCache>>) -> Self {
        Self { client, cache }
    }

    fn suggest(values: Vec<String>, prefix: &str, pos: usize) -> Vec<Suggestion> {
        let start = pos - prefix.len();
        values
            .into_iter()
            .map(|value| Suggestion {
                value,
                description: None,
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: true,
                match_indices: None,
            })
            .collect()
    }

    fn name_candidates(&mut self, command: Command) -> Vec<String> {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match command {
            Command::Database => cache.databases(self.client.as_ref()).to_vec(),
            Command::Collection => cache.active_collections(self.client.as_ref()).to_vec(),
            _ => Vec::new(),
        }
    }
}

impl Completer for ShellCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line_to_pos = &line[..pos];
        let words: Vec<&str> = line_to_pos.split_whitespace().collect();

        // Completing the command itself
        if words.is_empty() || (words.len() == 1 && !line_to_pos.ends_with(' ')) {
            let prefix = words.first().copied().unwrap_or("");
            let matches = Command::NAMES
                .iter()
                .filter(|name| name.starts_with(prefix))
                .map(|name| name.to_string())
                .collect();
            return Self::suggest(matches, prefix, pos);
        }

        // Completing the first argument of a selection command
        let Some(command) = Command::resolve(words[0]) else {
            return Vec::new();
        };
        if !matches!(command, Command::Database | Command::Collection) {
            return Vec::new();
        }
        let prefix = if line_to_pos.ends_with(char::is_whitespace) {
            ""
        } else {
            words.last().copied().unwrap_or("")
        };
        if words.len() > 2 || (words.len() == 2 && prefix.is_empty()) {
            return Vec::new();
        }

        let candidates = self.name_candidates(command);
        let matches: Vec<String> = completions_for(prefix, &candidates)
            .into_iter()
            .map(String::from)
            .collect();
        Self::suggest(matches, prefix, pos)
    }
}
