//! Index functions and the registry that names them.

use std::fmt;
use std::sync::Arc;

use kcache_meta::{MetaAccessor, accessor};
use rustc_hash::FxHashMap;

use crate::error::IndexFuncError;

/// Computes the indexed values of an object for one index.
///
/// Must be deterministic for a given object state.
pub type IndexFunc<T> = Arc<dyn Fn(&T) -> Result<Vec<String>, IndexFuncError> + Send + Sync>;

/// Lookup name of the namespace index.
pub const NAMESPACE_INDEX: &str = "namespace";

/// Indexes an object by its namespace.
///
/// Objects without metadata fail with a fallback of a single empty string, so
/// a best-effort store files them under `""`.
pub fn meta_namespace_index_func<T: MetaAccessor + ?Sized>(
	obj: &T,
) -> Result<Vec<String>, IndexFuncError> {
	match accessor(obj) {
		Ok(meta) => Ok(vec![meta.namespace.clone()]),
		Err(err) => Err(IndexFuncError::from(err).with_fallback(vec![String::new()])),
	}
}

/// Named index functions.
pub struct Indexers<T> {
	funcs: FxHashMap<String, IndexFunc<T>>,
}

impl<T> Indexers<T> {
	/// Creates an empty set of indexers.
	pub fn new() -> Self {
		Self {
			funcs: FxHashMap::default(),
		}
	}

	/// Adds an index function, replacing any previous one with the same name.
	pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
	where
		F: Fn(&T) -> Result<Vec<String>, IndexFuncError> + Send + Sync + 'static,
	{
		self.funcs.insert(name.into(), Arc::new(func));
		self
	}

	/// Inserts a shared index function, returning the one it replaced.
	pub fn insert(&mut self, name: impl Into<String>, func: IndexFunc<T>) -> Option<IndexFunc<T>> {
		self.funcs.insert(name.into(), func)
	}

	/// Returns the function registered under `name`.
	pub fn get(&self, name: &str) -> Option<&IndexFunc<T>> {
		self.funcs.get(name)
	}

	/// Returns true if `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.funcs.contains_key(name)
	}

	/// Returns the registered names, sorted.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<_> = self.funcs.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Iterates over `(name, function)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexFunc<T>)> {
		self.funcs.iter().map(|(name, func)| (name.as_str(), func))
	}

	pub fn len(&self) -> usize {
		self.funcs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.funcs.is_empty()
	}
}

impl<T: MetaAccessor + 'static> Indexers<T> {
	/// Indexers holding only [`NAMESPACE_INDEX`].
	pub fn namespace() -> Self {
		Self::new().with(NAMESPACE_INDEX, meta_namespace_index_func::<T>)
	}
}

impl<T> Default for Indexers<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Clone for Indexers<T> {
	fn clone(&self) -> Self {
		Self {
			funcs: self.funcs.clone(),
		}
	}
}

impl<T> fmt::Debug for Indexers<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.names()).finish()
	}
}

impl<T> FromIterator<(String, IndexFunc<T>)> for Indexers<T> {
	fn from_iter<I: IntoIterator<Item = (String, IndexFunc<T>)>>(iter: I) -> Self {
		Self {
			funcs: iter.into_iter().collect(),
		}
	}
}

impl<T> IntoIterator for Indexers<T> {
	type Item = (String, IndexFunc<T>);
	type IntoIter = std::collections::hash_map::IntoIter<String, IndexFunc<T>>;

	fn into_iter(self) -> Self::IntoIter {
		self.funcs.into_iter()
	}
}
