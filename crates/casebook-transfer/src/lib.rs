//! Portable JSON documents for importing and exporting single cases.
//!
//! Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use casebook_core::taxonomy::EventCatalog;
//! use casebook_transfer::parse;
//!
//! let doc = r#"{"name":"case1","subscriptions":[{"id":"id1","events":["Branch Taken"]}]}"#;
//! let new_case = parse(doc).unwrap().into_new_case(&EventCatalog::builtin()).unwrap();
//! println!("{} with {} subscriptions", new_case.name, new_case.subscriptions.len());
//! ```

pub mod error;
mod export;
mod import;

pub use error::{Error, Result};
pub use export::{ExportDocument, export, to_json};
pub use import::{ImportDocument, SubscriptionEntry, from_value, parse};
