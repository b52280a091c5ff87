use std::sync::{Arc, Mutex};

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::commands::Command;

/// Line highlighter: known commands in cyan, unknown in red, query text in
/// green, name arguments in yellow.
///
/// The highlighter sees every repaint, so it doubles as the host's view of
/// the line buffer: the editor clears the buffer before reporting Ctrl+C,
/// and the mirror holds what was on the line when that happened.
pub struct ShellHighlighter {
    line_mirror: Option<Arc<Mutex<String>>>,
}

impl ShellHighlighter {
    pub fn new() -> Self {
        Self { line_mirror: None }
    }

    /// Record each painted line into `mirror`.
    pub fn with_line_mirror(mut self, mirror: Arc<Mutex<String>>) -> Self {
        self.line_mirror = Some(mirror);
        self
    }
}

impl Default for ShellHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ShellHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        if let Some(mirror) = &self.line_mirror {
            let mut last = mirror
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            last.clear();
            last.push_str(line);
        }

        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let resolved = Command::resolve(command);
        let cmd_style = if resolved.is_some() {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((cmd_style, command.to_string()));

        if rest.is_empty() {
            return styled;
        }

        match resolved {
            Some(Command::Select) => {
                styled.push((Style::new().fg(Color::Green), rest.to_string()));
            }
            Some(Command::Database | Command::Collection | Command::Export) => {
                styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
            }
            _ => {
                styled.push((Style::new(), rest.to_string()));
            }
        }

        styled
    }
}
