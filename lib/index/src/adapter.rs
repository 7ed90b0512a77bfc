//! Maps documents and their processed vectors into index records.
//!
//! The adapter joins three inputs: a document, its corpus's resolved
//! [`CorpusConfig`], and the quantized theta vectors produced for it (one
//! per model). The output record carries only the fields the schema
//! displays or searches, minus the globally excluded metadata fields, so
//! derived internals never become separately queryable.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use topicx_core::{Document, Error, Result, SparseTopicVector};
use topicx_schema::{CorpusConfig, CorpusRegistry};

use crate::record::IndexRecord;

pub struct IndexingAdapter {
    registry: Arc<CorpusRegistry>,
}

impl IndexingAdapter {
    #[inline]
    #[must_use]
    pub fn new(registry: Arc<CorpusRegistry>) -> Self {
        Self { registry }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &CorpusRegistry {
        &self.registry
    }

    /// Turn a raw corpus row into a [`Document`]: the identifier comes from
    /// the corpus's `id_field`, the body is the concatenation of the
    /// searchable fields' text values.
    pub fn document_from_row(
        &self,
        corpus: &str,
        row: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Document> {
        let config = self.registry.resolve(corpus)?;
        let id = match row.get(&config.id_field) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => {
                return Err(Error::MissingField {
                    corpus: corpus.to_string(),
                    doc_id: String::new(),
                    field: config.id_field.clone(),
                })
            }
        };

        let mut body = String::new();
        for field in &config.searchable_fields {
            if let Some(text) = row.get(field).and_then(|v| v.as_str()) {
                if !body.is_empty() {
                    body.push(' ');
                }
                body.push_str(text);
            }
        }

        let mut metadata = serde_json::Map::new();
        for (name, value) in row {
            if name != &config.id_field {
                metadata.insert(name.clone(), value.clone());
            }
        }
        Ok(Document::new(id, body).with_metadata(metadata))
    }

    /// Build the index record for one document.
    ///
    /// Fails per document (carrying the document id and offending field)
    /// rather than per batch; see [`build_batch`](Self::build_batch).
    pub fn build_record(
        &self,
        corpus: &str,
        document: &Document,
        thetas: &[SparseTopicVector],
    ) -> Result<IndexRecord> {
        let config = self.registry.resolve(corpus)?;
        if document.id.is_empty() {
            return Err(Error::MissingField {
                corpus: corpus.to_string(),
                doc_id: String::new(),
                field: config.id_field.clone(),
            });
        }

        let fields = self.metadata_for(&config, document);

        let mut vectors = HashMap::with_capacity(thetas.len());
        for theta in thetas {
            if vectors
                .insert(theta.model_id().to_string(), theta.clone())
                .is_some()
            {
                return Err(Error::Indexing {
                    doc_id: document.id.clone(),
                    reason: format!("duplicate vector for model {}", theta.model_id()),
                });
            }
        }

        debug!(
            corpus,
            doc_id = %document.id,
            fields = fields.len(),
            models = vectors.len(),
            "built index record"
        );
        Ok(IndexRecord {
            id: document.id.clone(),
            fields,
            vectors,
        })
    }

    /// Build records for a batch, reporting failures per document without
    /// discarding the documents that succeeded.
    pub fn build_batch(
        &self,
        corpus: &str,
        documents: &[(Document, Vec<SparseTopicVector>)],
    ) -> (Vec<IndexRecord>, Vec<(String, Error)>) {
        let mut records = Vec::with_capacity(documents.len());
        let mut failures = Vec::new();
        for (document, thetas) in documents {
            match self.build_record(corpus, document, thetas) {
                Ok(record) => records.push(record),
                Err(error) => failures.push((document.id.clone(), error)),
            }
        }
        (records, failures)
    }

    fn metadata_for(
        &self,
        config: &CorpusConfig,
        document: &Document,
    ) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        for field in config.metadata_fields() {
            if self.registry.is_excluded(field) {
                continue;
            }
            if let Some(value) = document.metadata.get(field) {
                fields.insert(field.to_string(), value.clone());
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use topicx_schema::CorpusConfig;

    fn registry() -> Arc<CorpusRegistry> {
        let config = CorpusConfig {
            name: "cordis".to_string(),
            id_field: "projectID".to_string(),
            title_field: "title".to_string(),
            date_field: "startDate".to_string(),
            displayed_fields: vec!["objective".to_string(), "all_lemmas".to_string()],
            searchable_fields: vec!["title".to_string(), "objective".to_string()],
        };
        Arc::new(CorpusRegistry::new(vec![config], []).unwrap())
    }

    fn theta(model: &str) -> SparseTopicVector {
        SparseTopicVector::new(model, vec![(0, 600), (3, 400)]).unwrap()
    }

    #[test]
    fn test_document_from_row() {
        let adapter = IndexingAdapter::new(registry());
        let row = json!({
            "projectID": 101_874,
            "title": "Ocean acidification",
            "objective": "Study carbonate chemistry",
            "startDate": "2020-01-01T00:00:00Z"
        });
        let doc = adapter
            .document_from_row("cordis", row.as_object().unwrap())
            .unwrap();
        assert_eq!(doc.id, "101874");
        assert_eq!(doc.body, "Ocean acidification Study carbonate chemistry");
        assert!(doc.metadata.contains_key("title"));
        assert!(!doc.metadata.contains_key("projectID"));
    }

    #[test]
    fn test_row_missing_id_field() {
        let adapter = IndexingAdapter::new(registry());
        let row = json!({ "title": "No id here" });
        let err = adapter
            .document_from_row("cordis", row.as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "projectID"));
    }

    #[test]
    fn test_build_record_filters_excluded_fields() {
        let adapter = IndexingAdapter::new(registry());
        let doc = Document::new("d1", "body")
            .with_field("title", json!("Ocean acidification"))
            .with_field("objective", json!("Study carbonate chemistry"))
            .with_field("all_lemmas", json!("ocean acid chem"))
            .with_field("unrelated", json!("never configured"));

        let record = adapter
            .build_record("cordis", &doc, &[theta("mallet-25")])
            .unwrap();
        assert_eq!(record.id, "d1");
        // all_lemmas is displayed by the corpus config but globally excluded.
        assert!(!record.fields.contains_key("all_lemmas"));
        // Fields outside the config's display/search set are not indexed.
        assert!(!record.fields.contains_key("unrelated"));
        assert!(record.fields.contains_key("title"));
        assert!(record.vectors.contains_key("mallet-25"));
    }

    #[test]
    fn test_unknown_corpus() {
        let adapter = IndexingAdapter::new(registry());
        let doc = Document::new("d1", "");
        let err = adapter.build_record("nope", &doc, &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownCorpus(_)));
    }

    #[test]
    fn test_duplicate_model_vector_rejected() {
        let adapter = IndexingAdapter::new(registry());
        let doc = Document::new("d1", "");
        let err = adapter
            .build_record("cordis", &doc, &[theta("m"), theta("m")])
            .unwrap_err();
        assert!(matches!(err, Error::Indexing { .. }));
    }

    #[test]
    fn test_build_batch_partial_failure() {
        let adapter = IndexingAdapter::new(registry());
        let good = Document::new("d1", "").with_field("title", json!("ok"));
        let bad = Document::new("", "");
        let (records, failures) = adapter.build_batch(
            "cordis",
            &[(good, vec![theta("m")]), (bad, vec![])],
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "d1");
        assert_eq!(failures.len(), 1);
    }
}
