//! Output rendering: paged display, plain stream, file and pipe targets.

use std::io::{ErrorKind, IsTerminal, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

/// Where a rendered payload goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Pager when the terminal allows it, stdout otherwise.
    Interactive,
    /// Stdout, never the pager.
    Plain,
    /// Write or append to a file (leading `~` expanded, ANSI stripped).
    File { path: String, append: bool },
    /// Feed to an external process via `sh -c`.
    Pipe(String),
}

/// One output operation, constructed per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub payload: String,
    pub destination: Destination,
    pub colorize: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct OutputRenderer;

impl OutputRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, request: &RenderRequest) -> Result<(), RenderError> {
        match &request.destination {
            Destination::Interactive => self.render_interactive(request),
            Destination::Plain => write_stdout(&stream_payload(request)),
            Destination::File { path, append } => {
                write_file(path, *append, &strip_ansi_codes(&request.payload))
            }
            Destination::Pipe(command) => pipe_through(command, &request.payload),
        }
    }

    /// The pager path is an optimization: anything short of a working
    /// interactive terminal falls back to plain stdout.
    fn render_interactive(&self, request: &RenderRequest) -> Result<(), RenderError> {
        let text = stream_payload(request);

        if !(std::io::stdin().is_terminal() && std::io::stdout().is_terminal()) {
            return write_stdout(&text);
        }

        let (program, args) = pager_command();
        match PagerGuard::spawn(&program, &args) {
            Ok(mut pager) => {
                pager.feed(&text)?;
                Ok(())
            }
            Err(_) => write_stdout(&text),
        }
    }
}

/// Payload as the stream destinations write it: color passes through only
/// when the request allows it.
fn stream_payload(request: &RenderRequest) -> String {
    if request.colorize {
        request.payload.clone()
    } else {
        strip_ansi_codes(&request.payload)
    }
}

impl Default for OutputRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped pager subprocess: stdin is closed and the child is waited on
/// every exit path, including early termination by the user.
struct PagerGuard {
    child: Child,
}

impl PagerGuard {
    fn spawn(program: &str, args: &[String]) -> std::io::Result<Self> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()?;
        Ok(Self { child })
    }

    /// Write the payload to the pager. A broken pipe means the user quit
    /// the pager early; that is a normal action, not an error.
    fn feed(&mut self, text: &str) -> Result<(), RenderError> {
        if let Some(mut stdin) = self.child.stdin.take() {
            match stdin.write_all(text.as_bytes()) {
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                other => other?,
            }
        }
        Ok(())
    }
}

impl Drop for PagerGuard {
    fn drop(&mut self) {
        // Close stdin so the pager sees end-of-input, then wait, retrying
        // if the wait is interrupted by a signal.
        drop(self.child.stdin.take());
        loop {
            match self.child.wait() {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                _ => break,
            }
        }
    }
}

/// The configured pager program and its arguments.
fn pager_command() -> (String, Vec<String>) {
    if let Ok(pager) = std::env::var("PAGER") {
        let mut parts = pager.split_whitespace().map(String::from);
        if let Some(program) = parts.next() {
            return (program, parts.collect());
        }
    }
    ("less".to_string(), vec!["-R".to_string()])
}

fn write_stdout(text: &str) -> Result<(), RenderError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

fn write_file(path: &str, append: bool, text: &str) -> Result<(), RenderError> {
    let path = expand_home(path);
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

fn pipe_through(command: &str, text: &str) -> Result<(), RenderError> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(text.as_bytes()) {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
            other => other?,
        }
    }

    loop {
        match child.wait() {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
            Ok(_) => return Ok(()),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
