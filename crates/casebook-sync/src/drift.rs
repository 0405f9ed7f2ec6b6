//! Comparing the subscription index against the case store.

use std::collections::BTreeMap;

use casebook_core::{case::Case, index::IndexState};
use serde::Serialize;

/// Differences between the index and the store, by case name. Each list is
/// sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriftReport {
  /// Indexed names with no case in the store.
  pub stale:      Vec<String>,
  /// Stored cases with no index entry.
  pub missing:    Vec<String>,
  /// Cases whose index entry differs from their stored subscriptions.
  pub mismatched: Vec<String>,
}

impl DriftReport {
  pub fn compare(cases: &[Case], index: &IndexState) -> Self {
    let stored: BTreeMap<&str, &Case> = cases.iter().map(|c| (c.name.as_str(), c)).collect();

    let stale = index
      .keys()
      .filter(|name| !stored.contains_key(name.as_str()))
      .cloned()
      .collect();

    let mut missing = Vec::new();
    let mut mismatched = Vec::new();
    for (name, case) in stored {
      match index.get(name) {
        None => missing.push(name.to_owned()),
        Some(entry) if *entry != case.flattened() => mismatched.push(name.to_owned()),
        Some(_) => {}
      }
    }

    Self { stale, missing, mismatched }
  }

  pub fn is_clean(&self) -> bool {
    self.stale.is_empty() && self.missing.is_empty() && self.mismatched.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use casebook_core::case::{CaseId, Subscription};

  use super::*;

  fn case(id: i64, name: &str, subs: Vec<Subscription>) -> Case {
    Case { id: CaseId(id), name: name.into(), note: String::new(), subscriptions: subs }
  }

  #[test]
  fn matching_index_is_clean() {
    let cases = vec![case(1, "one", vec![Subscription::new("id1", ["a"])])];
    let index: IndexState = cases.iter().map(|c| (c.name.clone(), c.flattened())).collect();
    assert!(DriftReport::compare(&cases, &index).is_clean());
  }

  #[test]
  fn reports_each_kind_of_drift() {
    let cases = vec![
      case(1, "missing", vec![]),
      case(2, "changed", vec![Subscription::new("id1", ["a"])]),
    ];
    let mut index = IndexState::new();
    index.insert("changed".into(), Default::default());
    index.insert("ghost".into(), Default::default());

    let report = DriftReport::compare(&cases, &index);
    assert_eq!(report.stale, vec!["ghost"]);
    assert_eq!(report.missing, vec!["missing"]);
    assert_eq!(report.mismatched, vec!["changed"]);
    assert!(!report.is_clean());
  }
}
