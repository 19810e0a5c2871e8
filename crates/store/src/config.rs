//! Per-store behavior knobs.
//!
//! ```toml
//! index-error-policy = "best-effort"
//! late-indexers = "reject"
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// What a write does when an index function fails on the written object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexErrorPolicy {
	/// Fail the call and leave the store untouched.
	#[default]
	Reject,
	/// Log the failure, index the function's fallback values and keep the write.
	BestEffort,
}

/// What `add_indexers` does when the store already holds objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LateIndexerPolicy {
	/// Build the new indices over every stored object.
	#[default]
	Backfill,
	/// Refuse with [`StoreError::PopulatedStore`](crate::StoreError::PopulatedStore).
	Reject,
}

/// Store configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StoreConfig {
	/// Handling of index function failures during writes.
	pub index_error_policy: IndexErrorPolicy,
	/// Handling of indexers registered after objects were added.
	pub late_indexers: LateIndexerPolicy,
}

impl StoreConfig {
	/// Parses a config from a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}

	/// Returns a copy with a different index error policy.
	pub fn with_index_error_policy(mut self, policy: IndexErrorPolicy) -> Self {
		self.index_error_policy = policy;
		self
	}

	/// Returns a copy with a different late indexer policy.
	pub fn with_late_indexers(mut self, policy: LateIndexerPolicy) -> Self {
		self.late_indexers = policy;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_is_default() {
		assert_eq!(StoreConfig::from_toml_str("").unwrap(), StoreConfig::default());
	}

	#[test]
	fn parses_kebab_case_policies() {
		let config = StoreConfig::from_toml_str(
			"index-error-policy = \"best-effort\"\nlate-indexers = \"reject\"\n",
		)
		.unwrap();
		assert_eq!(config.index_error_policy, IndexErrorPolicy::BestEffort);
		assert_eq!(config.late_indexers, LateIndexerPolicy::Reject);
	}

	#[test]
	fn rejects_unknown_keys() {
		let err = StoreConfig::from_toml_str("resync-period = 30").unwrap_err();
		assert!(err.to_string().starts_with("invalid store config"));
	}
}
