//! Unified error types for servicedeck.
//!
//! Every failure a build can hit is a variant of [`Error`]; the build driver
//! stops at the first one in expansion order and never returns a partial deck.
use thiserror::Error;

/// Main error type for servicedeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A content part is missing required fields or carries invalid ones
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unknown or missing `Type` discriminator while decoding a content part
    #[error("Unsupported content part type: '{0}'")]
    UnsupportedVariant(String),

    /// A layout was requested that no template slide is bound to
    #[error("No template slide bound to layout '{0}'")]
    LayoutBinding(String),

    /// The verse text source failed or returned nothing usable
    #[error("Verse fetch failed: {0}")]
    ExternalFetch(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Stream or part not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),
}

/// Result type for servicedeck operations.
pub type Result<T> = std::result::Result<T, Error>;
