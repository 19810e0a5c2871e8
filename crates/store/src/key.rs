//! Key functions: deriving a storage key from an object.

use std::sync::Arc;

use kcache_meta::{MetaAccessor, accessor};

use crate::error::KeyError;
use crate::index::IndexFunc;

/// Computes the storage key of an object.
pub type KeyFunc<T> = Arc<dyn Fn(&T) -> Result<String, KeyError> + Send + Sync>;

/// Keys an object as `namespace/name`, or `name` when it is cluster-scoped.
pub fn meta_namespace_key_func<T: MetaAccessor + ?Sized>(obj: &T) -> Result<String, KeyError> {
	Ok(accessor(obj)?.key())
}

/// Turns an index function that yields exactly one value per object into a
/// key function.
///
/// Prefer a dedicated key function; this only suits indices that are unique
/// per object.
pub fn index_func_to_key_func<T: 'static>(index_func: IndexFunc<T>) -> KeyFunc<T> {
	Arc::new(move |obj: &T| -> Result<String, KeyError> {
		let mut values = index_func(obj)?;
		match values.len() {
			0 => Err(KeyError::EmptyKey),
			1 => Ok(values.swap_remove(0)),
			_ => Err(KeyError::AmbiguousKey { values }),
		}
	})
}
