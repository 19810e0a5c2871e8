//! Object-addressed stores.
//!
//! [`Cache`] derives every storage key with a [`KeyFunc`] and delegates to a
//! [`ThreadSafeStore`]. The [`Store`] and [`Indexer`] traits describe its
//! surface so consumers can hold a `dyn Indexer<T>`.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::StoreConfig;
use crate::error::{KeyError, Result};
use crate::index::Indexers;
use crate::key::KeyFunc;
use crate::thread_safe::ThreadSafeStore;

/// Object storage addressed through a key function.
pub trait Store<T>: Send + Sync {
	/// Inserts or replaces `obj` under its key.
	fn add(&self, obj: T) -> Result<()>;
	/// Same as [`Store::add`].
	fn update(&self, obj: T) -> Result<()>;
	/// Removes the object stored under `obj`'s key, if any.
	fn delete(&self, obj: &T) -> Result<()>;
	/// Returns every stored object in arbitrary order.
	fn list(&self) -> Vec<Arc<T>>;
	/// Returns every storage key in arbitrary order.
	fn list_keys(&self) -> Vec<String>;
	/// Returns the object stored under `obj`'s key.
	fn get(&self, obj: &T) -> Result<Option<Arc<T>>>;
	/// Returns the object stored under `key`.
	fn get_by_key(&self, key: &str) -> Option<Arc<T>>;
	/// Swaps the whole content for `items`.
	fn replace(&self, items: Vec<T>, resource_version: &str) -> Result<()>;
	/// Periodic resynchronization hook.
	fn resync(&self) -> Result<()>;
}

/// A [`Store`] with secondary indices.
pub trait Indexer<T>: Store<T> {
	/// Stored objects whose values for `index_name` intersect those of `obj`.
	fn index(&self, index_name: &str, obj: &T) -> Result<Vec<Arc<T>>>;
	/// Sorted keys of stored objects posted under `indexed_value`.
	fn index_keys(&self, index_name: &str, indexed_value: &str) -> Result<Vec<String>>;
	/// Every value with a live posting in `index_name`.
	fn list_index_func_values(&self, index_name: &str) -> Vec<String>;
	/// Stored objects posted under `indexed_value`.
	fn by_index(&self, index_name: &str, indexed_value: &str) -> Result<Vec<Arc<T>>>;
	/// Snapshot of the registered index functions.
	fn get_indexers(&self) -> Indexers<T>;
	/// Registers more index functions.
	fn add_indexers(&self, new_indexers: Indexers<T>) -> Result<()>;
}

/// Key-function driven store over a [`ThreadSafeStore`].
pub struct Cache<T> {
	key_func: KeyFunc<T>,
	store: ThreadSafeStore<T>,
	last_sync_resource_version: RwLock<Option<String>>,
}

impl<T> Cache<T> {
	/// Creates a store without indices.
	pub fn new_store<F>(key_func: F) -> Self
	where
		F: Fn(&T) -> std::result::Result<String, KeyError> + Send + Sync + 'static,
	{
		Self::with_config(key_func, Indexers::new(), StoreConfig::default())
	}

	/// Creates an indexed store.
	pub fn new_indexer<F>(key_func: F, indexers: Indexers<T>) -> Self
	where
		F: Fn(&T) -> std::result::Result<String, KeyError> + Send + Sync + 'static,
	{
		Self::with_config(key_func, indexers, StoreConfig::default())
	}

	pub fn with_config<F>(key_func: F, indexers: Indexers<T>, config: StoreConfig) -> Self
	where
		F: Fn(&T) -> std::result::Result<String, KeyError> + Send + Sync + 'static,
	{
		Self::from_parts(Arc::new(key_func), ThreadSafeStore::with_config(indexers, config))
	}

	/// Wraps an existing engine.
	pub fn from_parts(key_func: KeyFunc<T>, store: ThreadSafeStore<T>) -> Self {
		Self {
			key_func,
			store,
			last_sync_resource_version: RwLock::new(None),
		}
	}

	/// Derives the storage key of `obj`.
	pub fn key_of(&self, obj: &T) -> Result<String> {
		Ok((self.key_func)(obj)?)
	}

	/// The underlying key-addressed engine.
	pub fn thread_safe_store(&self) -> &ThreadSafeStore<T> {
		&self.store
	}

	/// Resource version passed to the latest successful [`Store::replace`].
	///
	/// Concurrent replaces commit contents and token in the same order, so the
	/// token never lags behind the contents it describes.
	pub fn last_sync_resource_version(&self) -> Option<String> {
		self.last_sync_resource_version.read().clone()
	}

	pub fn len(&self) -> usize {
		self.store.len()
	}

	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}
}

impl<T: Send + Sync> Store<T> for Cache<T> {
	fn add(&self, obj: T) -> Result<()> {
		let key = self.key_of(&obj)?;
		self.store.add(key, obj)
	}

	fn update(&self, obj: T) -> Result<()> {
		let key = self.key_of(&obj)?;
		self.store.update(key, obj)
	}

	fn delete(&self, obj: &T) -> Result<()> {
		let key = self.key_of(obj)?;
		self.store.delete(&key);
		Ok(())
	}

	fn list(&self) -> Vec<Arc<T>> {
		self.store.list()
	}

	fn list_keys(&self) -> Vec<String> {
		self.store.list_keys()
	}

	fn get(&self, obj: &T) -> Result<Option<Arc<T>>> {
		let key = self.key_of(obj)?;
		Ok(self.store.get(&key))
	}

	fn get_by_key(&self, key: &str) -> Option<Arc<T>> {
		self.store.get(key)
	}

	fn replace(&self, items: Vec<T>, resource_version: &str) -> Result<()> {
		let keyed = items
			.into_iter()
			.map(|obj| -> Result<(String, T)> { Ok((self.key_of(&obj)?, obj)) })
			.collect::<Result<Vec<_>>>()?;
		// Held across the swap so the token always names the contents it swapped in.
		let mut last_sync = self.last_sync_resource_version.write();
		self.store.replace(keyed, resource_version)?;
		*last_sync = Some(resource_version.to_owned());
		Ok(())
	}

	fn resync(&self) -> Result<()> {
		self.store.resync()
	}
}

impl<T: Send + Sync> Indexer<T> for Cache<T> {
	fn index(&self, index_name: &str, obj: &T) -> Result<Vec<Arc<T>>> {
		self.store.index(index_name, obj)
	}

	fn index_keys(&self, index_name: &str, indexed_value: &str) -> Result<Vec<String>> {
		self.store.index_keys(index_name, indexed_value)
	}

	fn list_index_func_values(&self, index_name: &str) -> Vec<String> {
		self.store.list_index_func_values(index_name)
	}

	fn by_index(&self, index_name: &str, indexed_value: &str) -> Result<Vec<Arc<T>>> {
		self.store.by_index(index_name, indexed_value)
	}

	fn get_indexers(&self) -> Indexers<T> {
		self.store.get_indexers()
	}

	fn add_indexers(&self, new_indexers: Indexers<T>) -> Result<()> {
		self.store.add_indexers(new_indexers)
	}
}
