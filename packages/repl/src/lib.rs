//! # cosmos-repl
//!
//! An interactive command shell for browsing a CosmosDB namespace and
//! running read queries against it.
//!
//! ## Features
//!
//! - Line editing with persistent history (`~/.cosmos-cli-history`)
//! - Tab completion of commands and live database/collection names
//! - Paged or plain output, with `>`/`>>`/`|` redirection per command
//! - Batch mode: pass command strings on the invocation line
//!
//! ## Usage
//!
//! ```bash
//! # Interactive
//! cosmos-cli
//!
//! # Inside the shell:
//! > database mydb
//! > collection mycoll
//! > select * from c where c.active = true
//! > export ~/results.json
//!
//! # Batch
//! cosmos-cli -d mydb -c mycoll "pager false" "select * from c"
//! ```

pub mod cache;
pub mod commands;
pub mod completer;
pub mod context;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod render;
pub mod repl;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use context::ShellContext;
pub use repl::ReplCore;
