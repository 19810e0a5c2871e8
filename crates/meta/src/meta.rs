use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{MetaError, Result};

/// Identity and labels of a stored object.
///
/// An empty namespace means the object is cluster-scoped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectMeta {
	/// Namespace the object lives in, empty for cluster-scoped objects.
	pub namespace: String,
	/// Object name, unique within its namespace.
	pub name: String,
	/// Free-form labels.
	pub labels: BTreeMap<String, String>,
	/// Opaque version assigned by the object's origin.
	pub resource_version: String,
}

impl ObjectMeta {
	/// Creates metadata for a namespaced object.
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			name: name.into(),
			..Self::default()
		}
	}

	/// Creates metadata for a cluster-scoped object.
	pub fn cluster_scoped(name: impl Into<String>) -> Self {
		Self::new(String::new(), name)
	}

	/// Adds a label, replacing any previous value for `key`.
	pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.labels.insert(key.into(), value.into());
		self
	}

	/// Sets the resource version.
	pub fn with_resource_version(mut self, version: impl Into<String>) -> Self {
		self.resource_version = version.into();
		self
	}

	/// Returns the `namespace/name` key, or just `name` when cluster-scoped.
	pub fn key(&self) -> String {
		crate::key::namespace_key(&self.namespace, &self.name)
	}
}

/// Capability for objects that may carry [`ObjectMeta`].
///
/// Returning `None` is how a type declares it has no metadata. Index
/// functions built on this trait treat that as a recoverable failure.
pub trait MetaAccessor {
	/// Returns the object's metadata, if it has any.
	fn object_meta(&self) -> Option<&ObjectMeta>;
}

impl MetaAccessor for ObjectMeta {
	fn object_meta(&self) -> Option<&ObjectMeta> {
		Some(self)
	}
}

impl<T: MetaAccessor + ?Sized> MetaAccessor for &T {
	fn object_meta(&self) -> Option<&ObjectMeta> {
		(**self).object_meta()
	}
}

impl<T: MetaAccessor + ?Sized> MetaAccessor for Box<T> {
	fn object_meta(&self) -> Option<&ObjectMeta> {
		(**self).object_meta()
	}
}

impl<T: MetaAccessor + ?Sized> MetaAccessor for Rc<T> {
	fn object_meta(&self) -> Option<&ObjectMeta> {
		(**self).object_meta()
	}
}

impl<T: MetaAccessor + ?Sized> MetaAccessor for Arc<T> {
	fn object_meta(&self) -> Option<&ObjectMeta> {
		(**self).object_meta()
	}
}

/// Returns the metadata of `obj`, or [`MetaError::NoMeta`] naming its type.
pub fn accessor<T: MetaAccessor + ?Sized>(obj: &T) -> Result<&ObjectMeta> {
	obj.object_meta().ok_or(MetaError::NoMeta {
		type_name: std::any::type_name::<T>(),
	})
}
