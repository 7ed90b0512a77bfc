//! Per-corpus field mapping.
//!
//! Each logical corpus names its own identifier, title and date fields plus
//! the lists of displayed and searchable fields. The config is immutable
//! once loaded; reconfiguration replaces the whole registry.

use serde::{Deserialize, Serialize};
use topicx_core::{Error, Result};

/// Field mapping for one logical corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusConfig {
    pub name: String,
    pub id_field: String,
    pub title_field: String,
    pub date_field: String,
    #[serde(default)]
    pub displayed_fields: Vec<String>,
    #[serde(default)]
    pub searchable_fields: Vec<String>,
}

impl CorpusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidConfig(
                "corpus name must not be empty".to_string(),
            ));
        }
        if self.id_field.is_empty() {
            return Err(Error::MissingField {
                corpus: self.name.clone(),
                doc_id: String::new(),
                field: "id_field".to_string(),
            });
        }
        Ok(())
    }

    /// Union of displayed and searchable fields plus title and date, in a
    /// stable order with duplicates removed. This is the candidate metadata
    /// set before the registry subtracts globally excluded fields.
    #[must_use]
    pub fn metadata_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for field in [self.title_field.as_str(), self.date_field.as_str()]
            .into_iter()
            .chain(self.displayed_fields.iter().map(String::as_str))
            .chain(self.searchable_fields.iter().map(String::as_str))
        {
            if !field.is_empty() && !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }

    /// Whether a field participates in text-match filtering.
    #[must_use]
    pub fn is_searchable(&self, field: &str) -> bool {
        self.searchable_fields.iter().any(|f| f == field) || field == self.title_field
    }
}
