//! The `CaseStore` trait: durable storage for case records.
//!
//! The trait is implemented by storage backends (e.g. `casebook-store-sqlite`).
//! A store owns the truth about which cases exist; it never touches the
//! [`SubscriptionIndex`](crate::index::SubscriptionIndex). Keeping the two in
//! step is the sync engine's job.

use std::future::Future;

use crate::case::{Case, CaseId, NewCase, Subscription};

/// Abstraction over a case record store backend.
///
/// Backends report missing ids and name collisions as
/// [`crate::Error::NotFound`] and [`crate::Error::DuplicateName`] once their
/// error is converted into the core error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new case with its initial subscriptions and assign its id.
  ///
  /// Fails if a case with exactly the same name already exists.
  fn create(
    &self,
    input: NewCase,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Partially update name and/or note. Absent fields are unchanged.
  ///
  /// Fails if `name` belongs to a different case.
  fn update(
    &self,
    id: CaseId,
    name: Option<String>,
    note: Option<String>,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Fully replace a case's subscription list.
  fn replace_subscriptions(
    &self,
    id: CaseId,
    subscriptions: Vec<Subscription>,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Delete a case and its subscriptions. Deleting twice is an error.
  fn delete(
    &self,
    id: CaseId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every case and reset id assignment.
  fn tear_down(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a case by id.
  fn get(
    &self,
    id: CaseId,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Retrieve a case by exact, case-sensitive name.
  fn find_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + 'a;

  /// List every case in insertion order.
  fn list(&self) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;
}
