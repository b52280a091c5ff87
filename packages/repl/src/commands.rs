//! Command parsing and execution.
//!
//! Commands (case-insensitive):
//! - `database <name>` - select a database
//! - `collection <name>` - select a collection
//! - `select <predicate>` - run a query (the SELECT keyword is supplied)
//! - `export <path>` - write the last result to a file
//! - `pager true|on|false|off` - toggle paged output
//! - `path` - print the selected collection path
//! - `exit` - leave the shell
//!
//! A line may carry a redirection suffix: `> file` overwrites, `>> file`
//! appends, `| command` pipes. Markers inside quotes are left alone.

use crate::context::{QueryError, ShellContext};
use crate::render::{Destination, RenderRequest};
use crate::session::OutputMode;

/// Result of executing one input line.
#[derive(Debug)]
pub enum CommandResult {
    /// Command succeeded, optionally with output to display.
    Ok { display: Option<String> },
    /// Conversational feedback (preconditions, usage, unknown commands).
    Feedback(String),
    /// A genuine failure, shown as an error banner.
    Error(String),
    /// A payload for the output renderer.
    Payload(RenderRequest),
    /// User requested to exit.
    Exit,
}

impl CommandResult {
    fn ok_display(display: impl Into<String>) -> Self {
        CommandResult::Ok {
            display: Some(display.into()),
        }
    }

    fn ok_none() -> Self {
        CommandResult::Ok { display: None }
    }
}

/// The fixed command registry, resolved once per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Database,
    Collection,
    Select,
    Export,
    Pager,
    Path,
    Exit,
}

impl Command {
    /// Command vocabulary, for completion and highlighting.
    pub const NAMES: &'static [&'static str] = &[
        "database",
        "collection",
        "select",
        "export",
        "pager",
        "path",
        "exit",
    ];

    pub fn resolve(name: &str) -> Option<Command> {
        match name.to_lowercase().as_str() {
            "database" => Some(Command::Database),
            "collection" => Some(Command::Collection),
            "select" => Some(Command::Select),
            "export" => Some(Command::Export),
            "pager" => Some(Command::Pager),
            "path" => Some(Command::Path),
            "exit" => Some(Command::Exit),
            _ => None,
        }
    }
}

/// Output redirection parsed from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    File { path: String, append: bool },
    Pipe(String),
}

/// Parse and execute one input line.
pub fn execute(input: &str, ctx: &mut ShellContext) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::ok_none();
    }

    let (body, redirect) = split_redirection(input);

    let (name, args) = match body.find(char::is_whitespace) {
        Some(pos) => (&body[..pos], body[pos..].trim_start()),
        None => (body.as_str(), ""),
    };

    let Some(command) = Command::resolve(name) else {
        return CommandResult::Feedback(format!("Unknown command: {}", name));
    };

    match command {
        Command::Database => select_database(args, ctx),
        Command::Collection => select_collection(args, ctx),
        Command::Select => run_select(args, redirect, ctx),
        Command::Export => run_export(args, ctx),
        Command::Pager => set_pager(args, ctx),
        Command::Path => CommandResult::ok_display(ctx.session().display_path()),
        Command::Exit => CommandResult::Exit,
    }
}

fn select_database(args: &str, ctx: &mut ShellContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Feedback("usage: database <database_name>".to_string());
    }
    match ctx.select_database(args) {
        Some(warning) => CommandResult::Feedback(warning),
        None => CommandResult::ok_none(),
    }
}

fn select_collection(args: &str, ctx: &mut ShellContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Feedback("usage: collection <collection_name>".to_string());
    }
    ctx.select_collection(args);
    CommandResult::ok_none()
}

fn run_select(args: &str, redirect: Option<Redirect>, ctx: &mut ShellContext) -> CommandResult {
    match ctx.run_query(args) {
        Ok(payload) => {
            let destination = match redirect {
                Some(Redirect::File { path, append }) => Destination::File { path, append },
                Some(Redirect::Pipe(command)) => Destination::Pipe(command),
                None => match ctx.session().output_mode {
                    OutputMode::Paged => Destination::Interactive,
                    OutputMode::Plain => Destination::Plain,
                },
            };
            CommandResult::Payload(RenderRequest {
                payload,
                destination,
                colorize: ctx.session().colorize(),
            })
        }
        Err(QueryError::Selection(e)) => CommandResult::Feedback(e.to_string()),
        Err(QueryError::Remote(e)) => {
            let message = e.server_message().unwrap_or_else(|| e.to_string());
            CommandResult::Error(message)
        }
    }
}

fn run_export(args: &str, ctx: &mut ShellContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Feedback("usage: export <path>".to_string());
    }
    match &ctx.session().last_result {
        None => CommandResult::Feedback("No result to export. Make a SELECT query.".to_string()),
        Some(result) => CommandResult::Payload(RenderRequest {
            payload: result.clone(),
            destination: Destination::File {
                path: args.to_string(),
                append: false,
            },
            colorize: false,
        }),
    }
}

fn set_pager(args: &str, ctx: &mut ShellContext) -> CommandResult {
    let mode = match args.to_lowercase().as_str() {
        "true" | "on" => OutputMode::Paged,
        "false" | "off" => OutputMode::Plain,
        _ => return CommandResult::Feedback("usage: pager true|on|false|off".to_string()),
    };
    ctx.session_mut().output_mode = mode;
    CommandResult::ok_display(match mode {
        OutputMode::Paged => "Pager enabled",
        OutputMode::Plain => "Pager disabled",
    })
}

/// Split a line at the first unquoted redirection marker. Single and double
/// quotes inhibit marker recognition so query text like `where c.a = ">"`
/// stays intact.
fn split_redirection(line: &str) -> (String, Option<Redirect>) {
    let mut in_single = false;
    let mut in_double = false;

    for (i, c) in line.char_indices() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '>' | '|' if !in_single && !in_double => {
                let before = line[..i].trim_end().to_string();
                let redirect = if c == '|' {
                    Redirect::Pipe(line[i + 1..].trim().to_string())
                } else {
                    let append = line[i + 1..].starts_with('>');
                    let target_start = if append { i + 2 } else { i + 1 };
                    Redirect::File {
                        path: strip_quotes(line[target_start..].trim()).to_string(),
                        append,
                    }
                };
                return (before, Some(redirect));
            }
            _ => {}
        }
    }

    (line.to_string(), None)
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
