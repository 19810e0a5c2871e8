//! Property tests for posting consistency.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use super::ThreadSafeStore;
use crate::index::{IndexFunc, Indexers};
use crate::test_fixtures::{TestObj, labeled, namespace_and_labels};

const KEYS: &[&str] = &["a", "b", "c", "d", "e"];
const NAMESPACES: &[&str] = &["ns1", "ns2", "ns3"];
const LABELS: &[(&str, &str)] = &[("app", "web"), ("app", "db"), ("tier", "front"), ("team", "x")];

#[derive(Debug, Clone)]
enum Op {
	Add(usize, TestObj),
	Delete(usize),
	Replace(Vec<(usize, TestObj)>),
}

fn arb_obj() -> impl Strategy<Value = TestObj> {
	(
		0..NAMESPACES.len(),
		proptest::collection::vec(0..LABELS.len(), 0..3),
	)
		.prop_map(|(ns, labels)| {
			let labels: Vec<_> = labels.into_iter().map(|i| LABELS[i]).collect();
			labeled(NAMESPACES[ns], "obj", &labels)
		})
}

fn arb_op() -> impl Strategy<Value = Op> {
	prop_oneof![
		6 => (0..KEYS.len(), arb_obj()).prop_map(|(k, obj)| Op::Add(k, obj)),
		3 => (0..KEYS.len()).prop_map(Op::Delete),
		1 => proptest::collection::vec((0..KEYS.len(), arb_obj()), 0..4).prop_map(Op::Replace),
	]
}

fn apply(store: &ThreadSafeStore<TestObj>, model: &mut BTreeMap<String, TestObj>, op: Op) {
	match op {
		Op::Add(k, obj) => {
			store.add(KEYS[k], obj.clone()).unwrap();
			model.insert(KEYS[k].to_owned(), obj);
		}
		Op::Delete(k) => {
			store.delete(KEYS[k]);
			model.remove(KEYS[k]);
		}
		Op::Replace(items) => {
			let items: Vec<_> = items
				.into_iter()
				.map(|(k, obj)| (KEYS[k].to_owned(), obj))
				.collect();
			store.replace(items.clone(), "rv").unwrap();
			*model = items.into_iter().collect();
		}
	}
}

/// Expected posting sets: value to keys, computed fresh from the model.
fn expected_postings(
	func: &IndexFunc<TestObj>,
	model: &BTreeMap<String, TestObj>,
) -> BTreeMap<String, BTreeSet<String>> {
	let mut postings: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
	for (key, obj) in model {
		for value in func(obj).unwrap() {
			postings.entry(value).or_default().insert(key.clone());
		}
	}
	postings
}

fn assert_consistent(
	store: &ThreadSafeStore<TestObj>,
	indexers: &Indexers<TestObj>,
	model: &BTreeMap<String, TestObj>,
) -> Result<(), TestCaseError> {
	for (name, func) in indexers.iter() {
		let expected = expected_postings(func, model);

		let values: BTreeSet<String> = store.list_index_func_values(name).into_iter().collect();
		prop_assert_eq!(&values, &expected.keys().cloned().collect::<BTreeSet<_>>());

		for (value, keys) in &expected {
			let found = store.index_keys(name, value).unwrap();
			prop_assert_eq!(found, keys.iter().cloned().collect::<Vec<_>>());
		}
	}
	let mut stored = store.list_keys();
	stored.sort();
	prop_assert_eq!(stored, model.keys().cloned().collect::<Vec<_>>());
	Ok(())
}

proptest! {
	/// After any sequence of writes, every key is posted under exactly the
	/// values its stored object yields, and no value lingers without keys.
	#[test]
	fn prop_postings_match_fresh_values(ops in proptest::collection::vec(arb_op(), 0..40)) {
		let indexers = namespace_and_labels();
		let store = ThreadSafeStore::new(indexers.clone());
		let mut model = BTreeMap::new();

		for op in ops {
			apply(&store, &mut model, op);
			assert_consistent(&store, &indexers, &model)?;
		}
	}

	/// Repeating an update changes nothing observable.
	#[test]
	fn prop_update_is_idempotent(
		seed in proptest::collection::vec((0..KEYS.len(), arb_obj()), 0..8),
		k in 0..KEYS.len(),
		obj in arb_obj(),
	) {
		let indexers = namespace_and_labels();
		let store = ThreadSafeStore::new(indexers.clone());
		let mut model = BTreeMap::new();
		apply(&store, &mut model, Op::Replace(seed));

		store.update(KEYS[k], obj.clone()).unwrap();
		model.insert(KEYS[k].to_owned(), obj.clone());
		assert_consistent(&store, &indexers, &model)?;

		store.update(KEYS[k], obj).unwrap();
		assert_consistent(&store, &indexers, &model)?;
	}

	/// Backfilled indices hold the same postings as indices registered up front.
	#[test]
	fn prop_backfill_matches_eager_registration(ops in proptest::collection::vec(arb_op(), 0..20)) {
		let indexers = namespace_and_labels();
		let late = ThreadSafeStore::new(Indexers::new());
		let mut model = BTreeMap::new();
		for op in ops {
			apply(&late, &mut model, op);
		}

		late.add_indexers(indexers.clone()).unwrap();
		assert_consistent(&late, &indexers, &model)?;
	}
}
