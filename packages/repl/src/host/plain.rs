//! Plain stdout/stderr host for batch mode and non-interactive runs.

use std::io::Write;

use crate::io::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Host without line editing: no prompt, no color, errors on stderr.
#[derive(Debug, Default)]
pub struct PlainHost;

impl PlainHost {
    pub fn new() -> Self {
        Self
    }
}

impl IoHost for PlainHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(None)
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(Some(Signal::Eof))
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        match output.style {
            OutputStyle::Error => eprintln!("Error: {}", output.text),
            _ => println!("{}", output.text),
        }
        Ok(())
    }

    fn write_prompt(&mut self, _config: PromptConfig) -> Result<(), IoError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        std::io::stdout()
            .flush()
            .map_err(|e| IoError::Io(e.to_string()))
    }
}
