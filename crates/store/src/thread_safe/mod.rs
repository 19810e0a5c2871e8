//! Key-addressed store engine.
//!
//! [`ThreadSafeStore`] owns the object table, the indexer registry and the
//! index tables behind one [`RwLock`]. Writers hold the write lock for the
//! whole mutation, so readers observe either none or all of it, postings
//! included. Readers share the read lock and never block each other.
//!
//! Index functions run on writes only; queries read the materialized tables.
//! The one exception is [`ThreadSafeStore::index`], which evaluates a function
//! on a candidate object that need not be stored.

mod tables;

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use self::tables::{Tables, compute_values};
use crate::config::{LateIndexerPolicy, StoreConfig};
use crate::error::{Result, StoreError};
use crate::index::Indexers;

/// Thread-safe object table with secondary indices.
pub struct ThreadSafeStore<T> {
	tables: RwLock<Tables<T>>,
	config: StoreConfig,
}

impl<T> ThreadSafeStore<T> {
	/// Creates an empty store with the default config.
	pub fn new(indexers: Indexers<T>) -> Self {
		Self::with_config(indexers, StoreConfig::default())
	}

	/// Creates an empty store.
	pub fn with_config(indexers: Indexers<T>, config: StoreConfig) -> Self {
		Self {
			tables: RwLock::new(Tables::new(indexers)),
			config,
		}
	}

	pub fn config(&self) -> &StoreConfig {
		&self.config
	}

	/// Stores `obj` under `key`, replacing any previous object.
	///
	/// Index values are computed before anything is written. With the default
	/// [`IndexErrorPolicy::Reject`](crate::IndexErrorPolicy::Reject) a failing
	/// index function leaves the store untouched.
	pub fn add(&self, key: impl Into<String>, obj: impl Into<Arc<T>>) -> Result<()> {
		let key = key.into();
		let obj = obj.into();
		let mut tables = self.tables.write();
		let values = compute_values(&tables.indexers, &key, &*obj, self.config.index_error_policy)?;
		tables.commit(key, obj, values);
		Ok(())
	}

	/// Same as [`add`](Self::add).
	pub fn update(&self, key: impl Into<String>, obj: impl Into<Arc<T>>) -> Result<()> {
		self.add(key, obj)
	}

	/// Removes the object at `key` with all its postings. Returns the removed
	/// object, or `None` if nothing was stored there.
	pub fn delete(&self, key: &str) -> Option<Arc<T>> {
		self.tables.write().remove(key)
	}

	pub fn get(&self, key: &str) -> Option<Arc<T>> {
		self.tables
			.read()
			.items
			.get(key)
			.map(|entry| Arc::clone(&entry.obj))
	}

	/// Returns every stored object in arbitrary order.
	pub fn list(&self) -> Vec<Arc<T>> {
		let tables = self.tables.read();
		tables.resolve(tables.items.keys())
	}

	/// Returns every storage key in arbitrary order.
	pub fn list_keys(&self) -> Vec<String> {
		self.tables.read().items.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.tables.read().items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.read().items.is_empty()
	}

	/// Swaps the whole content for `items` and rebuilds every index.
	///
	/// Readers see either the old or the new content, never a mix. If a key
	/// appears more than once the last object wins. `resource_version` is an
	/// opaque token and is only logged.
	pub fn replace<I, O>(&self, items: I, resource_version: &str) -> Result<()>
	where
		I: IntoIterator<Item = (String, O)>,
		O: Into<Arc<T>>,
	{
		let items: FxHashMap<String, Arc<T>> = items
			.into_iter()
			.map(|(key, obj)| (key, obj.into()))
			.collect();

		let mut tables = self.tables.write();
		let mut rebuilt = Vec::with_capacity(items.len());
		for (key, obj) in items {
			let values =
				compute_values(&tables.indexers, &key, &*obj, self.config.index_error_policy)?;
			rebuilt.push((key, obj, values));
		}
		let count = rebuilt.len();
		tables.rebuild(rebuilt);
		tracing::debug!(items = count, resource_version, "replaced store contents");
		Ok(())
	}

	/// No-op; there is nothing to resynchronize in memory.
	pub fn resync(&self) -> Result<()> {
		Ok(())
	}

	/// Returns the stored objects whose values for index `name` intersect the
	/// values of the candidate `obj`.
	pub fn index(&self, name: &str, obj: &T) -> Result<Vec<Arc<T>>> {
		let tables = self.tables.read();
		let func = tables
			.indexers
			.get(name)
			.ok_or_else(|| StoreError::UnregisteredIndex {
				name: name.to_owned(),
			})?;
		let values = func(obj).map_err(|source| StoreError::IndexFunc {
			index: name.to_owned(),
			key: None,
			source,
		})?;

		if let [value] = values.as_slice() {
			return Ok(match tables.postings(name, value)? {
				Some(keys) => tables.resolve(keys),
				None => Vec::new(),
			});
		}

		let mut keys = FxHashSet::default();
		for value in &values {
			if let Some(found) = tables.postings(name, value)? {
				keys.extend(found);
			}
		}
		Ok(tables.resolve(keys))
	}

	/// Returns the keys posted under `value` in index `name`, sorted.
	pub fn index_keys(&self, name: &str, value: &str) -> Result<Vec<String>> {
		let tables = self.tables.read();
		let mut keys: Vec<String> = tables
			.postings(name, value)?
			.map(|keys| keys.iter().cloned().collect())
			.unwrap_or_default();
		keys.sort_unstable();
		Ok(keys)
	}

	/// Returns every value with at least one posting in index `name`.
	///
	/// An unregistered index has no values.
	pub fn list_index_func_values(&self, name: &str) -> Vec<String> {
		self.tables
			.read()
			.indices
			.get(name)
			.map(|index| index.keys().cloned().collect())
			.unwrap_or_default()
	}

	/// Returns the stored objects posted under `value` in index `name`.
	pub fn by_index(&self, name: &str, value: &str) -> Result<Vec<Arc<T>>> {
		let tables = self.tables.read();
		Ok(match tables.postings(name, value)? {
			Some(keys) => tables.resolve(keys),
			None => Vec::new(),
		})
	}

	/// Returns a snapshot of the registered index functions.
	pub fn get_indexers(&self) -> Indexers<T> {
		self.tables.read().indexers.clone()
	}

	/// Registers more index functions.
	///
	/// Fails with [`StoreError::Conflict`] if any name is taken, registering
	/// nothing. On a populated store the new indices are backfilled or the call
	/// is refused, per [`StoreConfig::late_indexers`].
	pub fn add_indexers(&self, new: Indexers<T>) -> Result<()> {
		let mut tables = self.tables.write();

		let conflicts: Vec<String> = new
			.names()
			.into_iter()
			.filter(|name| tables.indexers.contains(name))
			.map(str::to_owned)
			.collect();
		if !conflicts.is_empty() {
			return Err(StoreError::Conflict { names: conflicts });
		}

		let names: Vec<String> = new.names().into_iter().map(str::to_owned).collect();
		if !tables.items.is_empty() {
			match self.config.late_indexers {
				LateIndexerPolicy::Reject => return Err(StoreError::PopulatedStore { names }),
				LateIndexerPolicy::Backfill => {
					tracing::debug!(
						indexers = ?names,
						items = tables.items.len(),
						"backfilling late indexers",
					);
				}
			}
		}

		tables.register(new, self.config.index_error_policy)?;
		tracing::debug!(indexers = ?names, "registered indexers");
		Ok(())
	}
}

impl<T> Default for ThreadSafeStore<T> {
	fn default() -> Self {
		Self::new(Indexers::new())
	}
}

#[cfg(test)]
mod invariants;
