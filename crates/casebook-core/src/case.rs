//! Case and subscription types: the durable unit of the Casebook catalog.
//!
//! A case is a named grouping of subscriptions. Its integer id is the only
//! immutable key; the name is a uniqueness-constrained attribute that may be
//! changed by an edit.

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt,
};

use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned case identifier. Never reused after deletion.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CaseId(pub i64);

impl fmt::Display for CaseId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// Events of interest per monitored entity: `entity_id → set(events)`.
pub type EntityEvents = BTreeMap<String, BTreeSet<String>>;

/// A binding of one monitored entity to the event names it is watched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
  /// Opaque identifier of the monitored entity.
  #[serde(rename = "id")]
  pub entity_id: String,
  /// Event-type names, kept in first-seen order. Required on input.
  pub events:    Vec<String>,
}

impl Subscription {
  pub fn new<I, E>(entity_id: impl Into<String>, events: I) -> Self
  where
    I: IntoIterator<Item = E>,
    E: Into<String>,
  {
    Self {
      entity_id: entity_id.into(),
      events:    events.into_iter().map(Into::into).collect(),
    }
  }
}

/// Flatten an ordered subscription list into its index form.
///
/// Repeated entity ids are merged; callers that validated their input
/// through [`EventTaxonomy`](crate::taxonomy::EventTaxonomy) never hit that.
pub fn flatten(subscriptions: &[Subscription]) -> EntityEvents {
  let mut out = EntityEvents::new();
  for sub in subscriptions {
    out
      .entry(sub.entity_id.clone())
      .or_default()
      .extend(sub.events.iter().cloned());
  }
  out
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// The full case representation returned by every read and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
  pub id:            CaseId,
  pub name:          String,
  #[serde(default)]
  pub note:          String,
  #[serde(default)]
  pub subscriptions: Vec<Subscription>,
}

impl Case {
  /// This case's subscriptions in index form.
  pub fn flattened(&self) -> EntityEvents { flatten(&self.subscriptions) }
}

/// Input for creating a case (before the id is assigned).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCase {
  pub name:          String,
  #[serde(default)]
  pub note:          String,
  #[serde(default)]
  pub subscriptions: Vec<Subscription>,
}

impl NewCase {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Default::default() }
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.note = note.into();
    self
  }

  pub fn with_subscriptions(mut self, subscriptions: Vec<Subscription>) -> Self {
    self.subscriptions = subscriptions;
    self
  }
}

// ─── Edits ───────────────────────────────────────────────────────────────────

/// How fields absent from a [`CaseUpdate`] are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
  /// Absent fields are left unchanged (PATCH).
  #[default]
  Merge,
  /// Absent `note` becomes empty and absent `subscriptions` clears the
  /// list (PUT). The name is kept when absent.
  Replace,
}

/// A partial edit of an existing case.
///
/// `subscriptions: None` and `subscriptions: Some(vec![])` are different
/// requests: the first leaves the list alone under [`EditMode::Merge`], the
/// second always clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseUpdate {
  pub name:          Option<String>,
  pub note:          Option<String>,
  pub subscriptions: Option<Vec<Subscription>>,
}

impl CaseUpdate {
  /// Resolve absent fields according to `mode`.
  pub fn resolve(self, mode: EditMode) -> Self {
    match mode {
      EditMode::Merge => self,
      EditMode::Replace => Self {
        name:          self.name,
        note:          Some(self.note.unwrap_or_default()),
        subscriptions: Some(self.subscriptions.unwrap_or_default()),
      },
    }
  }
}
