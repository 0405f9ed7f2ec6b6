//! The event-type vocabulary cases may subscribe to.
//!
//! The taxonomy is owned by the workflow engine that emits events; Casebook
//! only needs to ask "is this a known event name?" and to list the
//! categories for clients. [`EventCatalog`] is a closed, in-memory
//! implementation with a built-in vocabulary that deployments may extend.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::{
  Error, Result,
  case::Subscription,
};

/// Event category → event names.
pub type EventCategories = BTreeMap<String, BTreeSet<String>>;

/// A closed vocabulary of valid event names.
pub trait EventTaxonomy: Send + Sync {
  /// Every category with its event names.
  fn categories(&self) -> EventCategories;

  /// Whether `event` is a known event name in any category.
  fn contains(&self, event: &str) -> bool;

  /// Check a subscription payload and normalise it.
  ///
  /// Entity ids must be non-empty and unique within the list; every event
  /// must be known. Repeated event names within one subscription collapse to
  /// their first occurrence.
  fn validate_subscriptions(&self, subscriptions: Vec<Subscription>) -> Result<Vec<Subscription>> {
    let mut seen = HashSet::new();
    subscriptions
      .into_iter()
      .map(|sub| {
        if sub.entity_id.trim().is_empty() {
          return Err(Error::validation("subscription id must not be empty"));
        }
        if !seen.insert(sub.entity_id.clone()) {
          return Err(Error::validation(format!(
            "subscription id {:?} listed more than once",
            sub.entity_id
          )));
        }
        let mut unique = HashSet::new();
        let mut events = Vec::with_capacity(sub.events.len());
        for event in sub.events {
          if !self.contains(&event) {
            return Err(Error::validation(format!("unknown event {event:?}")));
          }
          if unique.insert(event.clone()) {
            events.push(event);
          }
        }
        Ok(Subscription { entity_id: sub.entity_id, events })
      })
      .collect()
  }
}

/// Reject empty or whitespace-only case names.
pub fn validate_case_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::validation("case name must not be empty"));
  }
  Ok(())
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

const BUILTIN: &[(&str, &[&str])] = &[
  ("controller", &[
    "Scheduler Start",
    "Scheduler Shutdown",
    "Scheduler Paused",
    "Scheduler Resumed",
    "Job Added",
    "Job Removed",
    "Job Executed",
    "Job Error",
  ]),
  ("workflow", &[
    "Workflow Execution Pending",
    "Workflow Execution Start",
    "Workflow Paused",
    "Workflow Resumed",
    "Workflow Aborted",
    "Workflow Shutdown",
    "Workflow Arguments Validated",
    "Workflow Arguments Invalid",
    "Trigger Action Awaiting Data",
    "Trigger Action Taken",
  ]),
  ("action", &[
    "Action Started",
    "Action Execution Success",
    "Action Execution Error",
    "Action Arguments Invalid",
  ]),
  ("branch", &["Branch Taken", "Branch Not Taken"]),
  ("condition", &["Condition Success", "Condition Error"]),
  ("transform", &["Transform Success", "Transform Error"]),
];

/// In-memory event vocabulary grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventCatalog {
  categories: EventCategories,
}

impl EventCatalog {
  /// An empty catalog; every subscription event will be rejected.
  pub fn new() -> Self { Self::default() }

  /// The workflow-execution vocabulary shipped with Casebook.
  pub fn builtin() -> Self {
    BUILTIN.iter().fold(Self::new(), |catalog, (category, events)| {
      catalog.with_category(*category, events.iter().copied())
    })
  }

  /// Add events to `category`, creating it if needed.
  pub fn with_category<I, E>(mut self, category: impl Into<String>, events: I) -> Self
  where
    I: IntoIterator<Item = E>,
    E: Into<String>,
  {
    self.extend(category, events);
    self
  }

  pub fn extend<I, E>(&mut self, category: impl Into<String>, events: I)
  where
    I: IntoIterator<Item = E>,
    E: Into<String>,
  {
    self
      .categories
      .entry(category.into())
      .or_default()
      .extend(events.into_iter().map(Into::into));
  }
}

impl FromIterator<(String, BTreeSet<String>)> for EventCatalog {
  fn from_iter<T: IntoIterator<Item = (String, BTreeSet<String>)>>(iter: T) -> Self {
    iter.into_iter().fold(Self::new(), |catalog, (category, events)| {
      catalog.with_category(category, events)
    })
  }
}

impl EventTaxonomy for EventCatalog {
  fn categories(&self) -> EventCategories { self.categories.clone() }

  fn contains(&self, event: &str) -> bool {
    self.categories.values().any(|events| events.contains(event))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn catalog() -> EventCatalog {
    EventCatalog::new().with_category("test", ["a", "b", "c"])
  }

  #[test]
  fn builtin_has_workflow_events() {
    let catalog = EventCatalog::builtin();
    assert!(catalog.contains("Workflow Execution Start"));
    assert!(catalog.categories().contains_key("action"));
    assert!(!catalog.contains("workflow"));
  }

  #[test]
  fn extend_merges_into_existing_category() {
    let mut catalog = catalog();
    catalog.extend("test", ["d"]);
    assert_eq!(catalog.categories()["test"].len(), 4);
  }

  #[test]
  fn validate_dedups_events() {
    let subs = catalog()
      .validate_subscriptions(vec![Subscription::new("id1", ["b", "a", "b"])])
      .unwrap();
    assert_eq!(subs[0].events, vec!["b", "a"]);
  }

  #[test]
  fn validate_rejects_unknown_event() {
    let err = catalog()
      .validate_subscriptions(vec![Subscription::new("id1", ["zzz"])])
      .unwrap_err();
    assert!(matches!(err, Error::Validation(m) if m.contains("zzz")));
  }

  #[test]
  fn validate_rejects_repeated_entity() {
    let err = catalog()
      .validate_subscriptions(vec![
        Subscription::new("id1", ["a"]),
        Subscription::new("id1", ["b"]),
      ])
      .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn validate_rejects_blank_entity() {
    assert!(catalog().validate_subscriptions(vec![Subscription::new(" ", ["a"])]).is_err());
  }

  #[test]
  fn blank_case_name_is_invalid() {
    assert!(validate_case_name("  ").is_err());
    assert!(validate_case_name("case1").is_ok());
  }
}
