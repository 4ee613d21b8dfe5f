//! Error handling for the requestgen code generation library.
//!
//! This module defines the main error type `Error` used throughout the
//! library, along with a convenient `Result` type alias. It uses `thiserror`
//! for easy error handling and implements conversions from common error
//! types.
//!
//! Generation-time errors fall into two families: fatal errors (malformed
//! declaration input, unusable annotation combinations) abort the whole run,
//! while per-type failures are collected by the generator so one bad type
//! does not sink its siblings.

use thiserror::Error;

/// Result type for requestgen generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for requestgen generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Declaration-set error: the input types could not be loaded or resolved
    #[error("declaration error: {0}")]
    Declaration(String),

    /// Annotation error: a field annotation is malformed or contradictory
    #[error("annotation error: {0}")]
    Annotation(String),

    /// Template error
    #[error("template error: {0}")]
    Template(String),

    /// Template engine error
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Schema fetch error (remote declaration sets)
    #[error("schema fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new declaration error
    pub fn declaration<S: Into<String>>(msg: S) -> Self {
        Self::Declaration(msg.into())
    }

    /// Create a new annotation error
    pub fn annotation<S: Into<String>>(msg: S) -> Self {
        Self::Annotation(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}
