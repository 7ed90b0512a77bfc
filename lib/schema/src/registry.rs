//! Corpus schema registry.
//!
//! Resolves a corpus name to its [`CorpusConfig`] by exact match and holds
//! the globally excluded metadata field set. Built once at load time and
//! shared immutably (`Arc`); reconfiguration means building a new registry
//! and swapping it wholesale.

use std::collections::HashSet;
use std::sync::Arc;

use ahash::AHashMap;
use topicx_core::{Error, Result};

use crate::corpus::CorpusConfig;

/// Fields that are never indexed as separate metadata, regardless of what a
/// corpus config displays or searches. Derived internal fields leaking into
/// the metadata set would become separately queryable.
pub const DEFAULT_EXCLUDED_FIELDS: &[&str] = &["all_lemmas", "embeddings", "_version_"];

#[derive(Debug)]
pub struct CorpusRegistry {
    corpora: AHashMap<String, Arc<CorpusConfig>>,
    excluded_fields: HashSet<String>,
}

impl CorpusRegistry {
    /// Build a registry from corpus configs plus extra excluded fields on
    /// top of [`DEFAULT_EXCLUDED_FIELDS`]. Every config is validated;
    /// duplicate corpus names are rejected.
    pub fn new(
        configs: Vec<CorpusConfig>,
        extra_excluded: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let mut corpora = AHashMap::with_capacity(configs.len());
        for config in configs {
            config.validate()?;
            let name = config.name.clone();
            if corpora.insert(name.clone(), Arc::new(config)).is_some() {
                return Err(Error::InvalidConfig(format!(
                    "duplicate corpus name '{name}'"
                )));
            }
        }
        let mut excluded_fields: HashSet<String> = DEFAULT_EXCLUDED_FIELDS
            .iter()
            .map(|s| s.to_string())
            .collect();
        excluded_fields.extend(extra_excluded);
        Ok(Self {
            corpora,
            excluded_fields,
        })
    }

    /// Resolve a corpus by exact name. Unknown corpora are a configuration
    /// error: a corpus must be registered before indexing or querying.
    pub fn resolve(&self, name: &str) -> Result<Arc<CorpusConfig>> {
        self.corpora
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownCorpus(name.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.corpora.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded_fields.contains(field)
    }

    #[inline]
    #[must_use]
    pub fn excluded_fields(&self) -> &HashSet<String> {
        &self.excluded_fields
    }

    #[must_use]
    pub fn corpus_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.corpora.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str) -> CorpusConfig {
        CorpusConfig {
            name: name.to_string(),
            id_field: "id".to_string(),
            title_field: "title".to_string(),
            date_field: "date".to_string(),
            displayed_fields: vec![],
            searchable_fields: vec!["title".to_string()],
        }
    }

    #[test]
    fn test_resolve_exact_name() {
        let registry = CorpusRegistry::new(vec![config("cordis")], []).unwrap();
        assert_eq!(registry.resolve("cordis").unwrap().name, "cordis");
        assert!(matches!(
            registry.resolve("Cordis"),
            Err(Error::UnknownCorpus(_))
        ));
    }

    #[test]
    fn test_duplicate_corpus_rejected() {
        let err = CorpusRegistry::new(vec![config("a"), config("a")], []).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_default_and_extra_exclusions() {
        let registry =
            CorpusRegistry::new(vec![config("a")], ["raw_text".to_string()]).unwrap();
        assert!(registry.is_excluded("all_lemmas"));
        assert!(registry.is_excluded("_version_"));
        assert!(registry.is_excluded("raw_text"));
        assert!(!registry.is_excluded("title"));
    }

    #[test]
    fn test_corpus_names_sorted() {
        let registry = CorpusRegistry::new(vec![config("b"), config("a")], []).unwrap();
        assert_eq!(registry.corpus_names(), vec!["a", "b"]);
    }
}
