//! Error types for metadata access.

use thiserror::Error;

/// Errors raised while reading object metadata or parsing storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
	/// The object type does not expose an [`ObjectMeta`](crate::ObjectMeta).
	#[error("object has no meta: {type_name} does not expose object metadata")]
	NoMeta {
		/// Rust type name of the offending object.
		type_name: &'static str,
	},

	/// A key did not have the `namespace/name` or `name` shape.
	#[error("unexpected key format: {key:?}")]
	InvalidKey {
		/// The rejected key.
		key: String,
	},
}

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, MetaError>;
