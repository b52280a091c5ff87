//! I/O abstraction for the shell.
//!
//! The REPL core interacts with the user only through the `IoHost` trait,
//! so the same loop drives the interactive reedline host, the plain batch
//! host, and mock hosts in tests.

pub mod types;

pub use types::*;

/// Error type for I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

/// Host interface for shell I/O operations.
pub trait IoHost {
    /// Wait for input to become available.
    ///
    /// After this returns, `read_input()` yields `Some(InputLine)` if a line
    /// is ready, or `read_signal()` yields `Some(Signal)` if the user sent
    /// an interrupt or end-of-input instead.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// Read the next input line, if available.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// Read any pending signal (Ctrl+C, Ctrl+D).
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    /// Write a message to the user.
    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Update the prompt shown before the next read.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
