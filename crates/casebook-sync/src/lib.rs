//! The case sync engine: the single write path for Casebook.
//!
//! Every mutation writes the [`CaseStore`](casebook_core::store::CaseStore)
//! first and the [`SubscriptionIndex`](casebook_core::index::SubscriptionIndex)
//! second, under one engine-wide lock. The store is the durable truth; the
//! index is a cache that is healed from the store whenever it is found to
//! disagree.

mod drift;
mod engine;

pub use drift::DriftReport;
pub use engine::CaseSyncEngine;
