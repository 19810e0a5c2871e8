use kcache_meta::{MetaAccessor, ObjectMeta};

use crate::error::IndexFuncError;
use crate::index::{Indexers, NAMESPACE_INDEX, meta_namespace_index_func};

pub(crate) const LABEL_INDEX: &str = "labels";

/// Test object; `meta: None` models an object without metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TestObj {
	pub(crate) meta: Option<ObjectMeta>,
	pub(crate) revision: u32,
}

impl MetaAccessor for TestObj {
	fn object_meta(&self) -> Option<&ObjectMeta> {
		self.meta.as_ref()
	}
}

pub(crate) fn pod(namespace: &str, name: &str) -> TestObj {
	TestObj {
		meta: Some(ObjectMeta::new(namespace, name)),
		revision: 0,
	}
}

pub(crate) fn labeled(namespace: &str, name: &str, labels: &[(&str, &str)]) -> TestObj {
	let meta = labels
		.iter()
		.fold(ObjectMeta::new(namespace, name), |meta, (k, v)| meta.with_label(*k, *v));
	TestObj {
		meta: Some(meta),
		revision: 0,
	}
}

pub(crate) fn opaque(revision: u32) -> TestObj {
	TestObj {
		meta: None,
		revision,
	}
}

/// Indexes every label as `key=value`. Fails on objects without metadata.
pub(crate) fn label_index_func(obj: &TestObj) -> Result<Vec<String>, IndexFuncError> {
	let meta = obj
		.meta
		.as_ref()
		.ok_or_else(|| IndexFuncError::new("object has no labels"))?;
	Ok(meta.labels.iter().map(|(k, v)| format!("{k}={v}")).collect())
}

pub(crate) fn namespace_and_labels() -> Indexers<TestObj> {
	Indexers::new()
		.with(NAMESPACE_INDEX, meta_namespace_index_func::<TestObj>)
		.with(LABEL_INDEX, label_index_func)
}

pub(crate) fn sorted<I, S>(values: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut out: Vec<String> = values.into_iter().map(Into::into).collect();
	out.sort();
	out
}
