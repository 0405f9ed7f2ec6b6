//! The write path that keeps the case store and subscription index in step.

use std::sync::{
  Arc,
  atomic::{AtomicU64, Ordering},
};

use casebook_core::{
  Error, Result,
  case::{Case, CaseId, CaseUpdate, EditMode, EntityEvents, NewCase},
  index::{IndexError, IndexState, SubscriptionIndex},
  store::CaseStore,
  taxonomy::{EventCatalog, EventCategories, EventTaxonomy, validate_case_name},
};
use casebook_transfer::{ExportDocument, ImportDocument};
use tokio::sync::Mutex;

use crate::drift::DriftReport;

/// The single write path for cases.
///
/// Mutations are serialised by one engine-wide lock so that the
/// "store write, then index write" pair is a single logical step. Reads of
/// the store and of the index do not take the lock.
pub struct CaseSyncEngine<S, T = EventCatalog> {
  store:    S,
  index:    Arc<SubscriptionIndex>,
  taxonomy: Arc<T>,
  writes:   Mutex<()>,
  drift:    AtomicU64,
}

impl<S, T> CaseSyncEngine<S, T>
where
  S: CaseStore,
  T: EventTaxonomy,
  Error: From<S::Error>,
{
  pub fn new(store: S, index: Arc<SubscriptionIndex>, taxonomy: Arc<T>) -> Self {
    Self {
      store,
      index,
      taxonomy,
      writes: Mutex::new(()),
      drift: AtomicU64::new(0),
    }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn index(&self) -> &Arc<SubscriptionIndex> { &self.index }

  pub fn taxonomy(&self) -> &T { &self.taxonomy }

  /// Number of index consistency faults detected (and healed) so far.
  pub fn drift_events(&self) -> u64 { self.drift.load(Ordering::Relaxed) }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Create a case and index its subscriptions.
  ///
  /// Only the store decides whether a name is taken: an index entry left
  /// behind for a name the store does not know is simply overwritten.
  pub async fn create_case(&self, input: NewCase) -> Result<Case> {
    validate_case_name(&input.name)?;
    let subscriptions = self.taxonomy.validate_subscriptions(input.subscriptions)?;
    let input = NewCase { subscriptions, ..input };

    let _guard = self.writes.lock().await;

    if self.store.find_by_name(&input.name).await?.is_some() {
      return Err(Error::DuplicateName(input.name));
    }
    let case = self.store.create(input).await?;
    self.index.upsert_case(&case.name, case.flattened());

    tracing::debug!(case = %case.name, id = %case.id, "created case");
    Ok(case)
  }

  /// Create a case from a parsed transfer document.
  pub async fn import_case(&self, doc: ImportDocument) -> Result<Case> {
    let input = doc.into_new_case(self.taxonomy())?;
    self.create_case(input).await
  }

  /// Create a case from a JSON transfer document.
  pub async fn import_json(&self, input: &str) -> Result<Case> {
    self.import_case(casebook_transfer::parse(input)?).await
  }

  /// Edit name, note, and/or subscriptions of an existing case.
  ///
  /// Supplied subscriptions replace the whole list; an entity omitted from
  /// the new list is dropped.
  pub async fn edit_case(&self, id: CaseId, update: CaseUpdate, mode: EditMode) -> Result<Case> {
    let update = update.resolve(mode);
    if let Some(name) = &update.name {
      validate_case_name(name)?;
    }
    let subscriptions = update
      .subscriptions
      .map(|subs| self.taxonomy.validate_subscriptions(subs))
      .transpose()?;

    let _guard = self.writes.lock().await;

    let current = self.store.get(id).await?;
    let rename = update.name.filter(|name| *name != current.name);

    let mut case = current.clone();
    if rename.is_some() || update.note.is_some() {
      case = self.store.update(id, rename.clone(), update.note).await?;
    }

    if let Some(new_name) = &rename
      && let Err(fault) = self.index.rename_case(&current.name, new_name)
    {
      self.heal(&fault, &case);
    }

    if let Some(subscriptions) = subscriptions {
      case = self.store.replace_subscriptions(id, subscriptions).await?;
      self.index.upsert_case(&case.name, case.flattened());
    }

    tracing::debug!(case = %case.name, id = %case.id, ?mode, "edited case");
    Ok(case)
  }

  /// Delete a case and drop its index entry.
  pub async fn delete_case(&self, id: CaseId) -> Result<()> {
    let _guard = self.writes.lock().await;

    let case = self.store.get(id).await?;
    self.store.delete(id).await?;
    if !self.index.remove_case(&case.name) {
      tracing::debug!(case = %case.name, id = %id, "deleted case had no index entry");
    }

    tracing::debug!(case = %case.name, id = %id, "deleted case");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn list_cases(&self) -> Result<Vec<Case>> { Ok(self.store.list().await?) }

  pub async fn get_case(&self, id: CaseId) -> Result<Case> { Ok(self.store.get(id).await?) }

  pub async fn export_case(&self, id: CaseId) -> Result<ExportDocument> {
    Ok(casebook_transfer::export(&self.store.get(id).await?))
  }

  /// What `case_name` is currently watching, straight from the index.
  pub fn subscriptions(&self, case_name: &str) -> EntityEvents { self.index.get(case_name) }

  /// Event categories clients may subscribe to.
  pub fn available_subscriptions(&self) -> EventCategories { self.taxonomy().categories() }

  // ── Consistency ───────────────────────────────────────────────────────

  /// Compare the index against the store without changing either.
  pub async fn audit(&self) -> Result<DriftReport> {
    let _guard = self.writes.lock().await;
    let cases = self.store.list().await?;
    Ok(DriftReport::compare(&cases, &self.index.snapshot()))
  }

  /// Populate the index from the store, discarding whatever it held.
  ///
  /// Used once at startup; unlike [`Self::resync`] an empty or partial index
  /// is expected here and is not counted as drift.
  pub async fn hydrate(&self) -> Result<usize> {
    let _guard = self.writes.lock().await;

    let cases = self.store.list().await?;
    self.index.set_subscriptions(index_state(&cases));

    tracing::info!(cases = cases.len(), "hydrated subscription index");
    Ok(cases.len())
  }

  /// Rebuild the whole index from the store and report what was wrong with
  /// the previous one.
  pub async fn resync(&self) -> Result<DriftReport> {
    let _guard = self.writes.lock().await;

    let cases = self.store.list().await?;
    let report = DriftReport::compare(&cases, &self.index.snapshot());
    self.index.set_subscriptions(index_state(&cases));

    if report.is_clean() {
      tracing::debug!(cases = cases.len(), "subscription index already in sync");
    } else {
      self.drift.fetch_add(1, Ordering::Relaxed);
      tracing::warn!(
        drift = true,
        stale = ?report.stale,
        missing = ?report.missing,
        mismatched = ?report.mismatched,
        "rebuilt subscription index from case store"
      );
    }
    Ok(report)
  }

  /// Restore `case`'s index entry from its stored form after a fault.
  fn heal(&self, fault: &IndexError, case: &Case) {
    self.drift.fetch_add(1, Ordering::Relaxed);
    tracing::warn!(
      drift = true,
      case = %case.name,
      id = %case.id,
      error = %fault,
      "subscription index out of step with case store; rebuilding entry"
    );
    self.index.upsert_case(&case.name, case.flattened());
  }
}

fn index_state(cases: &[Case]) -> IndexState {
  cases.iter().map(|c| (c.name.clone(), c.flattened())).collect()
}
