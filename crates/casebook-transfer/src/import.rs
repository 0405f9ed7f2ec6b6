//! Import document → [`NewCase`].

use casebook_core::{
  case::{NewCase, Subscription},
  taxonomy::{EventTaxonomy, validate_case_name},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One subscription in an import document. Both fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEntry {
  pub id:     String,
  pub events: Vec<String>,
}

/// A case as supplied for import. Unknown top-level fields are ignored, so
/// an exported `id` does not get in the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDocument {
  pub name:          String,
  /// Missing or `null` means empty.
  #[serde(default)]
  pub note:          Option<String>,
  /// Missing or `null` means no subscriptions.
  #[serde(default)]
  pub subscriptions: Option<Vec<SubscriptionEntry>>,
}

/// Parse a JSON import document.
pub fn parse(input: &str) -> Result<ImportDocument> { Ok(serde_json::from_str(input)?) }

/// Decode an import document a caller already holds as JSON.
pub fn from_value(value: serde_json::Value) -> Result<ImportDocument> {
  Ok(serde_json::from_value(value)?)
}

impl ImportDocument {
  /// Validate against `taxonomy` and produce the create request.
  pub fn into_new_case<T: EventTaxonomy + ?Sized>(self, taxonomy: &T) -> Result<NewCase> {
    validate_case_name(&self.name).map_err(|e| Error::Invalid(e.to_string()))?;

    let subscriptions = self
      .subscriptions
      .unwrap_or_default()
      .into_iter()
      .map(|entry| Subscription { entity_id: entry.id, events: entry.events })
      .collect();
    let subscriptions = taxonomy
      .validate_subscriptions(subscriptions)
      .map_err(|e| Error::Invalid(e.to_string()))?;

    Ok(NewCase {
      name: self.name,
      note: self.note.unwrap_or_default(),
      subscriptions,
    })
  }
}
