use serde::Serialize;
use thiserror::Error;

/// Identifier validation failures. Caller-correctable, always surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GtinError {
    #[error("Unsupported GTIN length")]
    UnsupportedLength,
    #[error("Invalid GTIN check digit")]
    InvalidCheckDigit,
}

/// Photo submission validation failures. Caller-correctable, always surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoRequestError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("Payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: usize, limit: usize },
}

/// Catalog snapshot loading failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog snapshot: {0}")]
    Parse(String),
}

/// Asset store write failures.
#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metadata error: {0}")]
    Metadata(String),
}

impl Serialize for GtinError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl Serialize for PhotoRequestError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
