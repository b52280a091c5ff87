//! Types crossing the core/host boundary.

/// A line of input from the user.
#[derive(Debug, Clone)]
pub struct InputLine {
    pub line: String,
}

/// A signal from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// User pressed Ctrl+C. `line_empty` is true when nothing had been
    /// typed yet; the core exits in that case and otherwise only aborts
    /// the current line.
    Interrupt { line_empty: bool },
    /// User pressed Ctrl+D (end of input).
    Eof,
}

/// A message for the user, with a style hint the host may act on.
#[derive(Debug, Clone)]
pub struct Output {
    pub text: String,
    pub style: OutputStyle,
}

impl Output {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Normal,
        }
    }

    pub fn feedback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Feedback,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Error,
        }
    }

    pub fn banner(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Banner,
        }
    }
}

/// Style hint for user-facing messages.
///
/// Feedback is the shell's conversational channel (precondition reminders,
/// export refusals, unknown commands); Error is the banner for rejected
/// queries and other genuine failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    #[default]
    Normal,
    Feedback,
    Error,
    Banner,
}

/// Prompt configuration sent from the core to the host.
#[derive(Debug, Clone, Default)]
pub struct PromptConfig {
    /// Current collection path, best-effort (empty when nothing selected).
    pub path: String,
    /// Whether the host may style the prompt path.
    pub colorize: bool,
}

/// Reason the shell exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// User typed 'exit'.
    UserExit,
    /// End of input (Ctrl+D or exhausted batch).
    Eof,
    /// Ctrl+C at an idle prompt.
    Interrupted,
}
