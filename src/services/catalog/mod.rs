//! Read-only product catalog collaborator.
//!
//! The catalog is owned and mutated elsewhere; this core only reads active
//! products. `CatalogSnapshot` is the concrete provider used by the CLI and
//! tests, loaded from a JSON export of the catalog service.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::services::gtin;
use crate::types::errors::CatalogError;

/// A canonical catalog item. (brand, name, weight) is unique among active
/// products; `gtin`, when present, is the canonical 14-digit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub id: i64,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub weight_grams: Option<u32>,
    #[serde(default)]
    pub gtin: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CanonicalProduct {
    /// Human-readable label used in candidate lists and payloads.
    pub fn display_name(&self) -> String {
        if self.brand.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.brand, self.name)
        }
    }
}

/// Source of active catalog products for one resolution batch.
pub trait ProductCatalog: Send + Sync {
    fn active_products(&self) -> Result<Vec<CanonicalProduct>, CatalogError>;
}

/// An immutable catalog snapshot.
///
/// Indexes and alias corpora built from a snapshot must not outlive it; a
/// fresh snapshot requires a fresh index.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    products: Vec<CanonicalProduct>,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<CanonicalProduct>) -> Self {
        let mut seen: HashSet<(String, String, Option<u32>)> = HashSet::new();
        for product in products.iter().filter(|p| p.active) {
            let key = (
                product.brand.to_lowercase(),
                product.name.to_lowercase(),
                product.weight_grams,
            );
            if !seen.insert(key) {
                warn!(
                    "[Catalog] Duplicate active identity (brand, name, weight) for product {}: {}",
                    product.id,
                    product.display_name()
                );
            }
        }
        Self { products }
    }

    /// Load from JSON string.
    /// Supports both a bare array `[{product1}, ...]` and an object
    /// `{"products": [...]}`. Identifiers that fail checksum validation are
    /// dropped with a warning rather than rejecting the whole snapshot.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let products: Vec<CanonicalProduct> = match value {
            serde_json::Value::Object(ref map) if map.contains_key("products") => {
                serde_json::from_value(map["products"].clone())
                    .map_err(|e| CatalogError::Parse(e.to_string()))?
            }
            serde_json::Value::Array(_) => {
                serde_json::from_value(value).map_err(|e| CatalogError::Parse(e.to_string()))?
            }
            _ => {
                return Err(CatalogError::Parse(
                    "expected array or object with 'products' key".to_string(),
                ))
            }
        };

        Ok(Self::new(canonicalize_identifiers(products)))
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for CatalogSnapshot {
    fn active_products(&self) -> Result<Vec<CanonicalProduct>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect())
    }
}

/// Replace raw identifier strings with their canonical 14-digit form.
/// Invalid identifiers are cleared, not fatal: the catalog service owns the
/// invariant, the resolver just refuses to join on a bad key.
fn canonicalize_identifiers(mut products: Vec<CanonicalProduct>) -> Vec<CanonicalProduct> {
    for product in &mut products {
        if let Some(raw) = product.gtin.take() {
            match gtin::canonicalize(&raw) {
                Ok(canonical) => product.gtin = Some(canonical.as_str().to_string()),
                Err(error) => {
                    warn!(
                        "[Catalog] Dropping identifier {raw:?} on product {}: {error}",
                        product.id
                    );
                }
            }
        }
    }
    products
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
