//! Encoding and decoding helpers between Casebook domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Event lists are stored as compact JSON arrays; everything else maps onto a
//! native column type.

use std::collections::BTreeMap;

use casebook_core::case::{Case, CaseId, Subscription};

use crate::Result;

// ─── Events ───────────────────────────────────────────────────────────────────

pub fn encode_events(events: &[String]) -> Result<String> { Ok(serde_json::to_string(events)?) }

pub fn decode_events(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

/// `(entity_id, events_json)` rows ready for insertion, in list order.
pub fn encode_subscriptions(subscriptions: &[Subscription]) -> Result<Vec<(String, String)>> {
  subscriptions
    .iter()
    .map(|sub| Ok((sub.entity_id.clone(), encode_events(&sub.events)?)))
    .collect()
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Undecoded `subscriptions` row.
pub struct RawSubscription {
  pub case_id:   i64,
  pub entity_id: String,
  pub events:    String,
}

impl RawSubscription {
  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      entity_id: self.entity_id,
      events:    decode_events(&self.events)?,
    })
  }
}

/// Undecoded `cases` row together with its subscription rows.
pub struct RawCase {
  pub case_id:       i64,
  pub name:          String,
  pub note:          String,
  pub subscriptions: Vec<RawSubscription>,
}

impl RawCase {
  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      id:            CaseId(self.case_id),
      name:          self.name,
      note:          self.note,
      subscriptions: self
        .subscriptions
        .into_iter()
        .map(RawSubscription::into_subscription)
        .collect::<Result<_>>()?,
    })
  }
}

/// Attach subscription rows to their cases, preserving case order.
pub fn assemble(cases: Vec<RawCase>, subscriptions: Vec<RawSubscription>) -> Result<Vec<Case>> {
  let mut by_case: BTreeMap<i64, Vec<RawSubscription>> = BTreeMap::new();
  for sub in subscriptions {
    by_case.entry(sub.case_id).or_default().push(sub);
  }

  cases
    .into_iter()
    .map(|mut raw| {
      raw.subscriptions = by_case.remove(&raw.case_id).unwrap_or_default();
      raw.into_case()
    })
    .collect()
}
