//! Error types for the store, its key functions and its index functions.

use kcache_meta::MetaError;
use thiserror::Error;

/// Failure reported by an index function.
///
/// An index function may attach fallback values. They are ignored when the
/// store rejects failed writes and indexed in place of the real values when
/// the store runs with [`IndexErrorPolicy::BestEffort`].
///
/// [`IndexErrorPolicy::BestEffort`]: crate::IndexErrorPolicy::BestEffort
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct IndexFuncError {
	message: String,
	fallback: Vec<String>,
}

impl IndexFuncError {
	/// Creates an error without fallback values.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			fallback: Vec::new(),
		}
	}

	/// Attaches values to index when the failure is tolerated.
	pub fn with_fallback(mut self, values: Vec<String>) -> Self {
		self.fallback = values;
		self
	}

	/// Human readable failure reason.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Values to index when the failure is tolerated.
	pub fn fallback(&self) -> &[String] {
		&self.fallback
	}
}

impl From<MetaError> for IndexFuncError {
	fn from(err: MetaError) -> Self {
		Self::new(err.to_string())
	}
}

/// Errors raised by key functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	/// An index function used as a key function yielded several values.
	#[error("too many keys: {values:?}")]
	AmbiguousKey {
		/// Every value the index function returned.
		values: Vec<String>,
	},

	/// An index function used as a key function yielded no value.
	#[error("unexpected empty index values")]
	EmptyKey,

	/// The underlying index function failed.
	#[error("index function failed: {0}")]
	Func(#[from] IndexFuncError),

	/// The object carries no usable metadata.
	#[error(transparent)]
	Meta(#[from] MetaError),
}

/// Errors raised by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
	/// A query named an index that was never registered.
	#[error("index {name:?} does not exist")]
	UnregisteredIndex {
		/// The requested index name.
		name: String,
	},

	/// An index function failed while indexing an object.
	///
	/// `key` is `None` when the object was a query candidate rather than a
	/// stored object.
	#[error(
		"index function {index:?} failed on {}: {source}",
		.key.as_deref().unwrap_or("query candidate")
	)]
	IndexFunc {
		/// Index whose function failed.
		index: String,
		/// Storage key of the object, when it has one.
		key: Option<String>,
		/// The function's own error.
		source: IndexFuncError,
	},

	/// `add_indexers` named indices that already exist. Nothing was registered.
	#[error("indexer conflict: {names:?} already registered")]
	Conflict {
		/// Names that collided, sorted.
		names: Vec<String>,
	},

	/// `add_indexers` was called on a populated store configured to refuse it.
	#[error("cannot add indexers {names:?} to a populated store")]
	PopulatedStore {
		/// Names that were refused, sorted.
		names: Vec<String>,
	},

	/// The key function failed to derive a storage key.
	#[error("couldn't derive storage key: {0}")]
	Key(#[from] KeyError),
}

/// Errors raised while loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed into a config.
	#[error("invalid store config: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
