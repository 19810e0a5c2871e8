//! Object metadata for kcache.
//!
//! Stored objects are opaque to the store. Key and index functions that need
//! a namespace or a name reach it through the [`MetaAccessor`] capability,
//! which any object type can implement. Types that carry no metadata return
//! `None`, and [`accessor`] turns that into a [`MetaError::NoMeta`].

/// Error types for metadata access and key parsing.
pub mod error;
/// `namespace/name` key formatting and splitting.
pub mod key;
/// The metadata record and the accessor capability.
pub mod meta;

pub use error::{MetaError, Result};
pub use key::{namespace_key, split_namespace_key};
pub use meta::{MetaAccessor, ObjectMeta, accessor};
