use crate::error::{MetaError, Result};

/// Formats a storage key: `namespace/name`, or `name` when `namespace` is empty.
pub fn namespace_key(namespace: &str, name: &str) -> String {
	if namespace.is_empty() {
		name.to_owned()
	} else {
		format!("{namespace}/{name}")
	}
}

/// Splits a key produced by [`namespace_key`] into `(namespace, name)`.
///
/// A key without a separator is cluster-scoped and yields an empty namespace.
/// More than one separator is rejected.
pub fn split_namespace_key(key: &str) -> Result<(&str, &str)> {
	let mut parts = key.split('/');
	match (parts.next(), parts.next(), parts.next()) {
		(Some(name), None, None) => Ok(("", name)),
		(Some(namespace), Some(name), None) => Ok((namespace, name)),
		_ => Err(MetaError::InvalidKey {
			key: key.to_owned(),
		}),
	}
}
