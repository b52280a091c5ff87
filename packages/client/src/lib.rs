//! # cosmos-client
//!
//! A minimal CosmosDB REST client for the `cosmos-cli` shell.
//!
//! The shell consumes the [`DocumentClient`] trait only; [`CosmosClient`] is
//! the concrete implementation over the SQL-API REST surface with
//! master-key request signing. Query compilation, fan-out and continuation
//! handling stay on the server side - this crate forwards a query string and
//! hands back whatever documents come out.

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

pub use client::{CosmosClient, DocumentClient};
pub use credentials::Credentials;
pub use error::CosmosError;
pub use types::{CollectionMeta, DatabaseMeta, QueryOptions};
