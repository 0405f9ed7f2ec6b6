//! Integration tests for `SqliteStore` against an in-memory database.

use casebook_core::{
  case::{CaseId, NewCase, Subscription},
  store::CaseStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn is_not_found(e: &Error) -> bool {
  matches!(e, Error::Core(casebook_core::Error::NotFound(_)))
}

fn is_duplicate(e: &Error) -> bool {
  matches!(e, Error::Core(casebook_core::Error::DuplicateName(_)))
}

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_first_id() {
  let s = store().await;
  let case = s.create(NewCase::named("case1").with_note("Test")).await.unwrap();
  assert_eq!(case.id, CaseId(1));
  assert_eq!(case.note, "Test");
  assert!(case.subscriptions.is_empty());

  let fetched = s.get(case.id).await.unwrap();
  assert_eq!(fetched, case);
}

#[tokio::test]
async fn create_persists_subscriptions_in_order() {
  let s = store().await;
  let subs = vec![
    Subscription::new("id2", ["e1"]),
    Subscription::new("id1", ["a", "b", "c"]),
  ];
  let case = s
    .create(NewCase::named("case1").with_subscriptions(subs.clone()))
    .await
    .unwrap();

  let fetched = s.get(case.id).await.unwrap();
  assert_eq!(fetched.subscriptions, subs);
}

#[tokio::test]
async fn create_duplicate_name_fails() {
  let s = store().await;
  s.create(NewCase::named("case1")).await.unwrap();
  let err = s.create(NewCase::named("case1")).await.unwrap_err();
  assert!(is_duplicate(&err), "unexpected error: {err}");
  assert_eq!(s.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn names_are_case_sensitive() {
  let s = store().await;
  s.create(NewCase::named("case1")).await.unwrap();
  s.create(NewCase::named("CASE1")).await.unwrap();
  assert_eq!(s.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn get_missing_is_not_found() {
  let s = store().await;
  let err = s.get(CaseId(404)).await.unwrap_err();
  assert!(is_not_found(&err));
}

#[tokio::test]
async fn find_by_name_is_exact() {
  let s = store().await;
  let case = s.create(NewCase::named("case1")).await.unwrap();
  assert_eq!(s.find_by_name("case1").await.unwrap(), Some(case));
  assert_eq!(s.find_by_name("Case1").await.unwrap(), None);
}

#[tokio::test]
async fn list_is_in_insertion_order() {
  let s = store().await;
  for name in ["b", "a", "c"] {
    s.create(NewCase::named(name)).await.unwrap();
  }
  let names: Vec<_> = s.list().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, vec!["b", "a", "c"]);
}

#[tokio::test]
async fn list_empty_store() {
  let s = store().await;
  assert!(s.list().await.unwrap().is_empty());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_is_partial() {
  let s = store().await;
  let case = s
    .create(
      NewCase::named("case1")
        .with_note("keep")
        .with_subscriptions(vec![Subscription::new("id1", ["a"])]),
    )
    .await
    .unwrap();

  let renamed = s.update(case.id, Some("renamed".into()), None).await.unwrap();
  assert_eq!(renamed.name, "renamed");
  assert_eq!(renamed.note, "keep");
  assert_eq!(renamed.subscriptions, case.subscriptions);

  let noted = s.update(case.id, None, Some("new".into())).await.unwrap();
  assert_eq!(noted.name, "renamed");
  assert_eq!(noted.note, "new");
}

#[tokio::test]
async fn update_to_other_cases_name_fails() {
  let s = store().await;
  let one = s.create(NewCase::named("one")).await.unwrap();
  s.create(NewCase::named("two")).await.unwrap();

  let err = s.update(one.id, Some("two".into()), None).await.unwrap_err();
  assert!(is_duplicate(&err));
  assert_eq!(s.get(one.id).await.unwrap().name, "one");
}

#[tokio::test]
async fn update_to_own_name_is_allowed() {
  let s = store().await;
  let one = s.create(NewCase::named("one")).await.unwrap();
  let same = s.update(one.id, Some("one".into()), None).await.unwrap();
  assert_eq!(same.name, "one");
}

#[tokio::test]
async fn update_missing_is_not_found() {
  let s = store().await;
  let err = s.update(CaseId(404), Some("x".into()), None).await.unwrap_err();
  assert!(is_not_found(&err));
}

#[tokio::test]
async fn replace_subscriptions_drops_omitted_entities() {
  let s = store().await;
  let case = s
    .create(NewCase::named("case1").with_subscriptions(vec![
      Subscription::new("id1", ["a"]),
      Subscription::new("id2", ["b"]),
    ]))
    .await
    .unwrap();

  let updated = s
    .replace_subscriptions(case.id, vec![Subscription::new("id2", ["c"])])
    .await
    .unwrap();
  assert_eq!(updated.subscriptions, vec![Subscription::new("id2", ["c"])]);

  let cleared = s.replace_subscriptions(case.id, vec![]).await.unwrap();
  assert!(cleared.subscriptions.is_empty());
}

#[tokio::test]
async fn replace_subscriptions_missing_is_not_found() {
  let s = store().await;
  let err = s.replace_subscriptions(CaseId(9), vec![]).await.unwrap_err();
  assert!(is_not_found(&err));
}

// ─── Delete / teardown ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_twice_is_an_error() {
  let s = store().await;
  let case = s.create(NewCase::named("case1")).await.unwrap();
  s.delete(case.id).await.unwrap();
  let err = s.delete(case.id).await.unwrap_err();
  assert!(is_not_found(&err));
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
  let s = store().await;
  s.create(NewCase::named("one")).await.unwrap();
  let two = s.create(NewCase::named("two")).await.unwrap();
  s.delete(two.id).await.unwrap();

  let three = s.create(NewCase::named("three")).await.unwrap();
  assert_eq!(three.id, CaseId(3));
}

#[tokio::test]
async fn delete_frees_the_name() {
  let s = store().await;
  let case = s
    .create(NewCase::named("case1").with_subscriptions(vec![Subscription::new("id1", ["a"])]))
    .await
    .unwrap();
  s.delete(case.id).await.unwrap();

  let again = s.create(NewCase::named("case1")).await.unwrap();
  assert!(again.subscriptions.is_empty());
  assert_eq!(s.get(again.id).await.unwrap().subscriptions, vec![]);
}

#[tokio::test]
async fn tear_down_resets_ids() {
  let s = store().await;
  s.create(NewCase::named("one")).await.unwrap();
  s.create(NewCase::named("two")).await.unwrap();

  s.tear_down().await.unwrap();
  assert!(s.list().await.unwrap().is_empty());

  let fresh = s.create(NewCase::named("one")).await.unwrap();
  assert_eq!(fresh.id, CaseId(1));
}

// ─── File-backed ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn cases_survive_reopen() {
  let dir  = tempfile::tempdir().unwrap();
  let path = dir.path().join("cases.db");

  let created = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create(NewCase::named("case1").with_subscriptions(vec![Subscription::new("id1", ["a"])]))
      .await
      .unwrap()
  };

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.list().await.unwrap(), vec![created]);
}
