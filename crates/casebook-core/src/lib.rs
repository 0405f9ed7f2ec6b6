//! Core types and trait definitions for Casebook.
//!
//! No HTTP or database dependencies live here. The store trait, the
//! subscription index, and the event taxonomy are defined in this crate and
//! implemented or composed by the others.

pub mod case;
pub mod error;
pub mod index;
pub mod store;
pub mod taxonomy;

pub use error::{Error, Result};
