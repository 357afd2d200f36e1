use std::collections::BTreeMap;

use kube::api::ObjectMeta;

#[derive(Default)]
pub struct ObjectMetaBuilder {
    inner: ObjectMeta,
}

impl ObjectMetaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name<T: ToString>(mut self, name: T) -> Self {
        self.inner.name = Some(name.to_string());
        self
    }

    pub fn namespace<T: ToString>(mut self, namespace: T) -> Self {
        self.inner.namespace = Some(namespace.to_string());
        self
    }

    pub fn with_label<T: ToString, U: ToString>(mut self, label: T, value: U) -> Self {
        let mut labels = self.inner.labels.unwrap_or_default();

        labels.insert(label.to_string(), value.to_string());

        self.inner.labels = Some(labels);
        self
    }

    pub fn with_annotation<T: ToString, U: ToString>(mut self, key: T, value: U) -> Self {
        let mut annotations = self.inner.annotations.unwrap_or_default();

        annotations.insert(key.to_string(), value.to_string());

        self.inner.annotations = Some(annotations);
        self
    }

    pub fn build(self) -> ObjectMeta {
        self.inner
    }
}

impl From<ObjectMetaBuilder> for ObjectMeta {
    fn from(builder: ObjectMetaBuilder) -> Self {
        builder.build()
    }
}

impl From<ObjectMetaBuilder> for Option<ObjectMeta> {
    fn from(builder: ObjectMetaBuilder) -> Self {
        Some(builder.build())
    }
}

/// Single-entry label map, as used by selectors.
pub fn labels<T: ToString, U: ToString>(key: T, value: U) -> BTreeMap<String, String> {
    BTreeMap::from([(key.to_string(), value.to_string())])
}
