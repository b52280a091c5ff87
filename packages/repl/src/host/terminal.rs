//! Terminal host implementation using Reedline.
//!
//! Provides line editing (vi and emacs modes), tab completion against live
//! name lists, command highlighting, and persistent history.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use cosmos_client::DocumentClient;
use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditMode, Emacs, KeyCode, KeyModifiers, MenuBuilder, Prompt,
    PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, ReedlineEvent,
    ReedlineMenu, Signal as ReedlineSignal, Vi,
};

use crate::cache::NameCache;
use crate::completer::ShellCompleter;
use crate::highlighter::ShellHighlighter;
use crate::io::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Terminal host using Reedline for interactive I/O.
pub struct TerminalHost {
    line_editor: Reedline,
    /// Last line the highlighter painted. Reedline clears its buffer
    /// before reporting Ctrl+C, so this is the only record of whether the
    /// interrupt hit an idle prompt or typed text.
    line_mirror: Arc<Mutex<String>>,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    current_prompt: PromptConfig,
}

impl TerminalHost {
    /// Create a new terminal host. The completer shares the name cache and
    /// collaborator handle with the shell context.
    pub fn new(
        client: Arc<dyn DocumentClient>,
        cache: Arc<Mutex<NameCache>>,
    ) -> io::Result<Self> {
        let completer = Box::new(ShellCompleter::new(client, cache));
        let line_mirror = Arc::new(Mutex::new(String::new()));
        let highlighter =
            Box::new(ShellHighlighter::new().with_line_mirror(Arc::clone(&line_mirror)));
        let hinter = Box::new(
            DefaultHinter::default().with_style(Style::new().fg(Color::LightGray).dimmed()),
        );

        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name("completion_menu")
                .with_text_style(Style::new().fg(Color::Cyan))
                .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold()),
        );

        let tab_completion = ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]);

        let edit_mode: Box<dyn EditMode> = if should_use_vi_mode() {
            let mut insert_keybindings = default_vi_insert_keybindings();
            let normal_keybindings = default_vi_normal_keybindings();
            insert_keybindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, tab_completion);
            Box::new(Vi::new(insert_keybindings, normal_keybindings))
        } else {
            let mut keybindings = default_emacs_keybindings();
            keybindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, tab_completion);
            Box::new(Emacs::new(keybindings))
        };

        let mut line_editor = Reedline::create()
            .with_completer(completer)
            .with_highlighter(highlighter)
            .with_hinter(hinter)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(edit_mode);

        if let Some(history_path) = history_path() {
            if let Ok(history) = reedline::FileBackedHistory::with_file(1000, history_path) {
                line_editor = line_editor.with_history(Box::new(history));
            }
        }

        Ok(Self {
            line_editor,
            line_mirror,
            pending_input: None,
            pending_signal: None,
            current_prompt: PromptConfig::default(),
        })
    }
}

impl IoHost for TerminalHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        let prompt = CollectionPrompt::from_config(&self.current_prompt);

        match self.line_editor.read_line(&prompt) {
            Ok(ReedlineSignal::Success(line)) => {
                self.pending_input = Some(InputLine { line });
            }
            Ok(ReedlineSignal::CtrlC) => {
                let line_empty = self
                    .line_mirror
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .trim()
                    .is_empty();
                self.pending_signal = Some(Signal::Interrupt { line_empty });
            }
            Ok(ReedlineSignal::CtrlD) => {
                self.pending_signal = Some(Signal::Eof);
            }
            Err(e) => {
                return Err(IoError::Io(format!("Reedline error: {}", e)));
            }
        }

        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        let colorize = self.current_prompt.colorize;
        let styled = match output.style {
            OutputStyle::Normal => output.text,
            OutputStyle::Error if colorize => {
                format!("{} {}", Color::Red.bold().paint("Error:"), output.text)
            }
            OutputStyle::Error => format!("Error: {}", output.text),
            OutputStyle::Feedback if colorize => {
                Color::Cyan.paint(&output.text).to_string()
            }
            OutputStyle::Feedback => output.text,
            OutputStyle::Banner if colorize => Color::Cyan.paint(&output.text).to_string(),
            OutputStyle::Banner => output.text,
        };
        println!("{}", styled);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.current_prompt = config;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush().map_err(|e| IoError::Io(e.to_string()))
    }
}

/// The `[<path>] ` prompt. Brackets are bold white; the path is styled only
/// when color is permitted.
struct CollectionPrompt {
    path: String,
    colorize: bool,
}

impl CollectionPrompt {
    fn from_config(config: &PromptConfig) -> Self {
        Self {
            path: config.path.clone(),
            colorize: config.colorize,
        }
    }
}

impl Prompt for CollectionPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        if self.colorize {
            Cow::Owned(format!(
                "{}{}{}",
                Color::White.bold().paint("["),
                Color::White.paint(&self.path),
                Color::White.bold().paint("]")
            ))
        } else {
            Cow::Owned(format!("[{}]", self.path))
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(" ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".cosmos-cli-history"))
}

/// Check if vi mode should be used based on environment configuration.
fn should_use_vi_mode() -> bool {
    if let Ok(mode) = std::env::var("COSMOS_CLI_EDIT_MODE") {
        let mode = mode.to_lowercase();
        return mode == "vi" || mode == "vim";
    }

    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = std::env::var(var) {
            let editor = editor.to_lowercase();
            if editor.contains("vim") || editor == "vi" {
                return true;
            }
        }
    }

    check_inputrc_vi_mode()
}

/// Check .inputrc for a vi editing-mode setting.
fn check_inputrc_vi_mode() -> bool {
    let inputrc_paths = [
        std::env::var("INPUTRC").ok().map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".inputrc")),
        Some(PathBuf::from("/etc/inputrc")),
    ];

    for path in inputrc_paths.into_iter().flatten() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            for line in content.lines() {
                let line = line.trim();
                if line.starts_with("set") && line.contains("editing-mode") && line.contains("vi")
                {
                    return true;
                }
            }
        }
    }

    false
}
