//! Core types and trait definitions for the medcert certificate registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It defines the per-table schema descriptors, the loose [`Record`] value
//! type exchanged with clients, the domain error taxonomy, and the
//! [`CertificateStore`] abstraction implemented by storage backends.
//!
//! [`Record`]: record::Record
//! [`CertificateStore`]: store::CertificateStore

pub mod error;
pub mod record;
pub mod schema;
pub mod store;

pub use error::{Error, Result};
pub use record::Record;
pub use schema::Table;
