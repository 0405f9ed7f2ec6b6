//! Case → export document.

use casebook_core::case::{Case, CaseId};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Subscription-focused export form of a case.
///
/// `events` is every event name of every subscription, flattened in
/// subscription order. Names shared by several entities appear once per
/// entity. The note is not exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
  pub id:     CaseId,
  pub name:   String,
  pub events: Vec<String>,
}

pub fn export(case: &Case) -> ExportDocument {
  ExportDocument {
    id:     case.id,
    name:   case.name.clone(),
    events: case
      .subscriptions
      .iter()
      .flat_map(|sub| sub.events.iter().cloned())
      .collect(),
  }
}

/// Render `doc` as pretty-printed JSON.
pub fn to_json(doc: &ExportDocument) -> Result<String> { Ok(serde_json::to_string_pretty(doc)?) }
