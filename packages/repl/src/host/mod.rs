//! Host implementations of the I/O abstraction.

pub mod plain;
pub mod terminal;

pub use plain::PlainHost;
pub use terminal::TerminalHost;
