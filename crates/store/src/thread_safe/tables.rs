//! Object table and index tables guarded by the store lock.
//!
//! # Invariants
//!
//! - For every stored key `k` and registered index `n`, the values under which
//!   `k` is posted in `indices[n]` are exactly `items[k].values[n]`.
//! - No posting set is empty; a value is dropped with its last key.
//! - `indices` and `indexers` name the same set of indices.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::IndexErrorPolicy;
use crate::error::{Result, StoreError};
use crate::index::Indexers;

pub(super) type ValueSet = FxHashSet<String>;

/// Indexed values of one object, per index name.
pub(super) type IndexedValues = FxHashMap<String, ValueSet>;

/// Indexed value to posting set of storage keys.
pub(super) type Index = FxHashMap<String, FxHashSet<String>>;

/// A stored object with the values it is currently posted under.
pub(super) struct Entry<T> {
	pub(super) obj: Arc<T>,
	values: IndexedValues,
}

pub(super) struct Tables<T> {
	pub(super) items: FxHashMap<String, Entry<T>>,
	pub(super) indexers: Indexers<T>,
	pub(super) indices: FxHashMap<String, Index>,
}

impl<T> Tables<T> {
	pub(super) fn new(indexers: Indexers<T>) -> Self {
		let indices = indexers
			.iter()
			.map(|(name, _)| (name.to_owned(), Index::default()))
			.collect();
		Self {
			items: FxHashMap::default(),
			indexers,
			indices,
		}
	}

	/// Stores `obj` under `key`, moving its postings from the previous
	/// object's values to `values`.
	pub(super) fn commit(&mut self, key: String, obj: Arc<T>, values: IndexedValues) {
		let previous = self.items.remove(&key);
		update_postings(
			&mut self.indices,
			&key,
			previous.as_ref().map(|entry| &entry.values),
			Some(&values),
		);
		self.items.insert(key, Entry { obj, values });
	}

	/// Removes the object at `key` and every posting that points at it.
	pub(super) fn remove(&mut self, key: &str) -> Option<Arc<T>> {
		let entry = self.items.remove(key)?;
		update_postings(&mut self.indices, key, Some(&entry.values), None);
		Some(entry.obj)
	}

	/// Drops all objects and rebuilds the index tables from `items`.
	pub(super) fn rebuild(&mut self, items: Vec<(String, Arc<T>, IndexedValues)>) {
		let mut indices: FxHashMap<String, Index> = self
			.indexers
			.iter()
			.map(|(name, _)| (name.to_owned(), Index::default()))
			.collect();
		let mut table = FxHashMap::with_capacity_and_hasher(items.len(), Default::default());
		for (key, obj, values) in items {
			update_postings(&mut indices, &key, None, Some(&values));
			table.insert(key, Entry { obj, values });
		}
		self.items = table;
		self.indices = indices;
	}

	/// Registers `new` and posts every stored object under the new indices.
	///
	/// Values are computed for all objects before anything is registered, so a
	/// rejected failure leaves the tables as they were.
	pub(super) fn register(&mut self, new: Indexers<T>, policy: IndexErrorPolicy) -> Result<()> {
		let mut backfill = Vec::with_capacity(self.items.len());
		for (key, entry) in &self.items {
			backfill.push((key.clone(), compute_values(&new, key, entry.obj.as_ref(), policy)?));
		}

		for (name, func) in new {
			self.indices.entry(name.clone()).or_default();
			self.indexers.insert(name, func);
		}
		for (key, values) in backfill {
			update_postings(&mut self.indices, &key, None, Some(&values));
			if let Some(entry) = self.items.get_mut(&key) {
				entry.values.extend(values);
			}
		}
		Ok(())
	}

	/// Posting set for `value` in index `name`.
	///
	/// `Ok(None)` means the index exists but nothing is posted under `value`.
	pub(super) fn postings(&self, name: &str, value: &str) -> Result<Option<&FxHashSet<String>>> {
		let index = self
			.indices
			.get(name)
			.ok_or_else(|| StoreError::UnregisteredIndex {
				name: name.to_owned(),
			})?;
		Ok(index.get(value))
	}

	/// Resolves storage keys to stored objects, skipping absent keys.
	pub(super) fn resolve<'a>(&self, keys: impl IntoIterator<Item = &'a String>) -> Vec<Arc<T>> {
		keys.into_iter()
			.filter_map(|key| self.items.get(key).map(|entry| Arc::clone(&entry.obj)))
			.collect()
	}
}

/// Runs every function in `indexers` on `obj`.
///
/// Under [`IndexErrorPolicy::Reject`] the first failure is returned. Under
/// [`IndexErrorPolicy::BestEffort`] it is logged and the function's fallback
/// values stand in.
pub(super) fn compute_values<T>(
	indexers: &Indexers<T>,
	key: &str,
	obj: &T,
	policy: IndexErrorPolicy,
) -> Result<IndexedValues> {
	let mut values = IndexedValues::default();
	for (name, func) in indexers.iter() {
		let set = match func(obj) {
			Ok(found) => found.into_iter().collect(),
			Err(err) => match policy {
				IndexErrorPolicy::Reject => {
					return Err(StoreError::IndexFunc {
						index: name.to_owned(),
						key: Some(key.to_owned()),
						source: err,
					});
				}
				IndexErrorPolicy::BestEffort => {
					tracing::warn!(
						index = name,
						key,
						error = %err,
						fallback = ?err.fallback(),
						"index function failed; indexing fallback values",
					);
					err.fallback().iter().cloned().collect()
				}
			},
		};
		values.insert(name.to_owned(), set);
	}
	Ok(values)
}

/// Moves `key` from the `old` values to the `new` values in every index.
///
/// Values present in both are left alone.
fn update_postings(
	indices: &mut FxHashMap<String, Index>,
	key: &str,
	old: Option<&IndexedValues>,
	new: Option<&IndexedValues>,
) {
	let none = ValueSet::default();
	for (name, index) in indices.iter_mut() {
		let old = old.and_then(|values| values.get(name)).unwrap_or(&none);
		let new = new.and_then(|values| values.get(name)).unwrap_or(&none);

		for value in old.difference(new) {
			if let Some(keys) = index.get_mut(value) {
				keys.remove(key);
				if keys.is_empty() {
					index.remove(value);
				}
			}
		}
		for value in new.difference(old) {
			index.entry(value.clone()).or_default().insert(key.to_owned());
		}
	}
}
