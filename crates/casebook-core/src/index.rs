//! The in-memory subscription index used on the event-dispatch hot path.
//!
//! The index maps case *name* → entity id → event names. It is derived state:
//! everything in it can be rebuilt from the case store at any time, so
//! writes to it are cache maintenance rather than a second source of truth.
//!
//! Bulk replacement ([`SubscriptionIndex::set_subscriptions`],
//! [`SubscriptionIndex::clear_subscriptions`]) builds the new map first and
//! swaps it in under the write lock, so readers see either the old index or
//! the new one, never a half-built one.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use thiserror::Error;

use crate::case::EntityEvents;

/// Full index contents: `case_name → entity_id → events`.
pub type IndexState = BTreeMap<String, EntityEvents>;

/// A consistency fault detected while updating the index.
///
/// These mean the index has drifted from the case store. They are logged and
/// healed by the caller; they are never reported as a failed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
  #[error("no index entry for case {0:?}")]
  MissingCase(String),
}

/// Process-wide subscription index. Construct one per logical tenant and
/// share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct SubscriptionIndex {
  cases: RwLock<IndexState>,
}

impl SubscriptionIndex {
  pub fn new() -> Self { Self::default() }

  /// Create an index already holding `state`.
  pub fn with_state(state: IndexState) -> Self { Self { cases: RwLock::new(state) } }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Unconditionally overwrite the whole index.
  pub fn set_subscriptions(&self, state: IndexState) {
    *self.cases.write() = state;
  }

  /// Empty the index.
  pub fn clear_subscriptions(&self) { self.set_subscriptions(IndexState::new()); }

  // ── Per-case maintenance ──────────────────────────────────────────────

  /// Insert or fully replace one case's entry.
  pub fn upsert_case(&self, case_name: &str, subscriptions: EntityEvents) {
    self.cases.write().insert(case_name.to_owned(), subscriptions);
  }

  /// Move an entry to a new name. Any entry already under `new_name` is
  /// replaced.
  pub fn rename_case(&self, old_name: &str, new_name: &str) -> Result<(), IndexError> {
    let mut cases = self.cases.write();
    let entry = cases
      .remove(old_name)
      .ok_or_else(|| IndexError::MissingCase(old_name.to_owned()))?;
    cases.insert(new_name.to_owned(), entry);
    Ok(())
  }

  /// Remove an entry. Returns whether one was present; absence is not an
  /// error because a case may be deleted before it was ever indexed.
  pub fn remove_case(&self, case_name: &str) -> bool {
    self.cases.write().remove(case_name).is_some()
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// The subscriptions of `case_name`; empty when the case is unknown.
  pub fn get(&self, case_name: &str) -> EntityEvents {
    self.cases.read().get(case_name).cloned().unwrap_or_default()
  }

  pub fn contains_case(&self, case_name: &str) -> bool {
    self.cases.read().contains_key(case_name)
  }

  /// Does `case_name` watch `event` on `entity_id`?
  pub fn is_subscribed(&self, case_name: &str, entity_id: &str, event: &str) -> bool {
    self
      .cases
      .read()
      .get(case_name)
      .and_then(|entities| entities.get(entity_id))
      .is_some_and(|events| events.contains(event))
  }

  /// Names of every case watching `event` on `entity_id`, sorted.
  pub fn interested_cases(&self, entity_id: &str, event: &str) -> Vec<String> {
    self
      .cases
      .read()
      .iter()
      .filter(|(_, entities)| {
        entities.get(entity_id).is_some_and(|events| events.contains(event))
      })
      .map(|(name, _)| name.clone())
      .collect()
  }

  pub fn snapshot(&self) -> IndexState { self.cases.read().clone() }

  pub fn case_names(&self) -> Vec<String> { self.cases.read().keys().cloned().collect() }

  pub fn len(&self) -> usize { self.cases.read().len() }

  pub fn is_empty(&self) -> bool { self.cases.read().is_empty() }
}
