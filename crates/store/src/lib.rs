#![cfg_attr(doc, allow(rustdoc::private_intra_doc_links))]
//! In-memory object store with secondary indices.
//!
//! # Purpose
//!
//! Holds the latest state of a stream of objects and answers exact-match
//! queries on values derived from them ("all objects in namespace X") without
//! scanning the whole object set.
//!
//! # Mental Model
//!
//! 1. **Object table:** storage key to current object.
//! 2. **Indexers:** index name to [`IndexFunc`], which maps an object to zero
//!    or more indexed values.
//! 3. **Indices:** index name to (indexed value to set of storage keys).
//!
//! Every write computes the object's indexed values, moves its postings from
//! the old values to the new ones and commits the object. Queries only read
//! the tables.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`ThreadSafeStore`] | Key-addressed engine owning all tables behind one lock. |
//! | [`Cache`] | Object-addressed store that derives keys with a [`KeyFunc`]. |
//! | [`Store`] / [`Indexer`] | Traits describing the [`Cache`] surface. |
//! | [`Indexers`] | Named index functions. |
//! | [`StoreConfig`] | Failure-handling policies. |
//!
//! # Concurrency
//!
//! - **Writes** (`add`, `update`, `delete`, `replace`, `add_indexers`) take
//!   the write lock for the whole mutation.
//! - **Reads** share the read lock and see one consistent state per call.
//!
//! # Invariants
//!
//! - For every stored key `k` and index `n` with function `f`, `k` is posted
//!   under exactly the deduplicated values of `f(items[k])`.
//!   - Enforced in: `thread_safe::tables::Tables::commit`.
//!   - Tested by: `thread_safe::invariants::prop_postings_match_fresh_values`.
//! - No posting set is empty; values disappear with their last key.
//!   - Enforced in: `thread_safe::tables::update_postings`.
//!   - Tested by: `thread_safe::tests::delete_drops_values_with_their_last_key`.
//! - A rejected write leaves the store untouched.
//!   - Enforced in: [`ThreadSafeStore::add`], [`ThreadSafeStore::replace`].
//!   - Tested by: `thread_safe::tests::rejected_add_leaves_store_untouched`.

mod cache;
mod config;
mod error;
mod index;
mod key;
mod thread_safe;

pub use cache::{Cache, Indexer, Store};
pub use config::{IndexErrorPolicy, LateIndexerPolicy, StoreConfig};
pub use error::{ConfigError, IndexFuncError, KeyError, Result, StoreError};
pub use index::{IndexFunc, Indexers, NAMESPACE_INDEX, meta_namespace_index_func};
pub use kcache_meta::{MetaAccessor, ObjectMeta, split_namespace_key};
pub use key::{KeyFunc, index_func_to_key_func, meta_namespace_key_func};
pub use thread_safe::ThreadSafeStore;

#[cfg(test)]
pub(crate) mod test_fixtures;
