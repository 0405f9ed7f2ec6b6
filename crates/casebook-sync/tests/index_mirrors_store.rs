//! After any sequence of mutations, the subscription index is exactly the
//! flattened form of the store: one entry per case, nothing else.

use std::{collections::BTreeMap, sync::Arc};

use casebook_core::{
  case::{CaseUpdate, EditMode, NewCase, Subscription},
  index::{IndexState, SubscriptionIndex},
  taxonomy::EventCatalog,
};
use casebook_store_sqlite::SqliteStore;
use casebook_sync::CaseSyncEngine;
use proptest::prelude::*;

const NAMES: &[&str] = &["alpha", "beta", "gamma", "delta"];
const ENTITIES: &[&str] = &["id1", "id2", "id3"];
const EVENTS: &[&str] = &["a", "b", "c"];

#[derive(Debug, Clone)]
enum Op {
  Create { name: usize, subscriptions: Vec<Subscription> },
  Rename { slot: usize, name: usize },
  Resubscribe { slot: usize, subscriptions: Vec<Subscription>, mode: EditMode },
  Note { slot: usize, mode: EditMode },
  Delete { slot: usize },
}

fn subscriptions_strategy() -> impl Strategy<Value = Vec<Subscription>> {
  proptest::collection::btree_map(
    proptest::sample::select(ENTITIES),
    proptest::collection::vec(proptest::sample::select(EVENTS), 0..4),
    0..3,
  )
  .prop_map(|by_entity: BTreeMap<&str, Vec<&str>>| {
    by_entity
      .into_iter()
      .map(|(entity, events)| Subscription::new(entity, events))
      .collect()
  })
}

fn mode_strategy() -> impl Strategy<Value = EditMode> {
  prop_oneof![Just(EditMode::Merge), Just(EditMode::Replace)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
  let name = 0..NAMES.len();
  let slot = 0usize..6;
  prop_oneof![
    (name.clone(), subscriptions_strategy())
      .prop_map(|(name, subscriptions)| Op::Create { name, subscriptions }),
    (slot.clone(), name).prop_map(|(slot, name)| Op::Rename { slot, name }),
    (slot.clone(), subscriptions_strategy(), mode_strategy()).prop_map(
      |(slot, subscriptions, mode)| Op::Resubscribe { slot, subscriptions, mode }
    ),
    (slot.clone(), mode_strategy()).prop_map(|(slot, mode)| Op::Note { slot, mode }),
    slot.prop_map(|slot| Op::Delete { slot }),
  ]
}

async fn run(ops: Vec<Op>) -> (IndexState, IndexState) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let catalog = EventCatalog::new().with_category("test", EVENTS.iter().copied());
  let engine = CaseSyncEngine::new(store, Arc::new(SubscriptionIndex::new()), Arc::new(catalog));

  for op in ops {
    let cases = engine.list_cases().await.unwrap();
    let pick = |slot: usize| (!cases.is_empty()).then(|| cases[slot % cases.len()].id);

    // Duplicate names and missing slots are expected failures here; only the
    // resulting state matters.
    match op {
      Op::Create { name, subscriptions } => {
        let input = NewCase::named(NAMES[name]).with_subscriptions(subscriptions);
        let _ = engine.create_case(input).await;
      }
      Op::Rename { slot, name } => {
        if let Some(id) = pick(slot) {
          let update = CaseUpdate { name: Some(NAMES[name].into()), ..Default::default() };
          let _ = engine.edit_case(id, update, EditMode::Merge).await;
        }
      }
      Op::Resubscribe { slot, subscriptions, mode } => {
        if let Some(id) = pick(slot) {
          let update = CaseUpdate { subscriptions: Some(subscriptions), ..Default::default() };
          let _ = engine.edit_case(id, update, mode).await;
        }
      }
      Op::Note { slot, mode } => {
        if let Some(id) = pick(slot) {
          let update = CaseUpdate { note: Some("n".into()), ..Default::default() };
          let _ = engine.edit_case(id, update, mode).await;
        }
      }
      Op::Delete { slot } => {
        if let Some(id) = pick(slot) {
          let _ = engine.delete_case(id).await;
        }
      }
    }
  }

  let expected = engine
    .list_cases()
    .await
    .unwrap()
    .iter()
    .map(|c| (c.name.clone(), c.flattened()))
    .collect();
  (engine.index().snapshot(), expected)
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn index_mirrors_store(ops in proptest::collection::vec(op_strategy(), 0..24)) {
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .unwrap();
    let (index, expected) = runtime.block_on(run(ops));
    prop_assert_eq!(index, expected);
  }
}
