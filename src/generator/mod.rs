//! Clash Meta configuration generation
//!
//! [`generate`] turns decoded nodes into a [`ClashDocument`], either from the
//! built-in skeleton or by splicing nodes into a user template.
//! [`check`] and [`validate`] inspect a finished document.
//! [`derive_template`] turns an existing configuration into a template.

pub mod config;
pub mod exports;
pub mod yaml;

use thiserror::Error;

pub use exports::clash::{check, derive_template, generate, validate, ClashDocument};

/// Errors raised while building a document.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("proxy node list is empty")]
    EmptyInput,
    #[error("template parse failed: {0}")]
    TemplateFormat(String),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// The first problem found in a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("configuration is missing required key `{0}`")]
    Missing(&'static str),
    #[error("configuration key `{0}` is empty")]
    Empty(&'static str),
}
