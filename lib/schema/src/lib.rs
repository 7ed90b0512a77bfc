//! # TopicX Schema
//!
//! Corpus schema registry and process-wide numeric budgets.
//!
//! Each logical corpus maps to a [`CorpusConfig`] naming its identifier,
//! title, date, displayed and searchable fields. The [`CorpusRegistry`]
//! resolves corpora by exact name and subtracts the globally excluded
//! metadata fields before anything is indexed. [`GlobalBudgets`] carries the
//! quantization budgets and batch size, validated once at load time.

pub mod budgets;
pub mod corpus;
pub mod registry;

pub use budgets::GlobalBudgets;
pub use corpus::CorpusConfig;
pub use registry::{CorpusRegistry, DEFAULT_EXCLUDED_FIELDS};
