use serde::{Deserialize, Serialize};

/// A raw document belonging to one corpus: stable identifier, text body,
/// and the metadata fields the corpus schema knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub body: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            metadata: serde_json::Map::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(name.into(), value);
        self
    }
}
