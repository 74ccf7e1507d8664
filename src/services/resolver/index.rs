//! Candidate index built from one catalog snapshot.
//!
//! Rebuilt per resolution batch, never incrementally patched: a full
//! rebuild is cheap next to the correctness risk of a profile outliving
//! the snapshot it came from.

use std::collections::HashSet;

use crate::services::catalog::{CanonicalProduct, ProductCatalog};
use crate::types::errors::CatalogError;

use super::normalizer::{self, Vocabulary};

/// Derived matching profile for one product, valid for one batch.
#[derive(Debug, Clone)]
pub struct TokenProfile {
    pub tokens: HashSet<String>,
    pub weight_grams: Option<u32>,
    pub brand_slug: String,
    pub full_slug: String,
}

#[derive(Debug, Clone)]
pub struct IndexedProduct {
    pub product: CanonicalProduct,
    pub profile: TokenProfile,
}

#[derive(Debug, Clone)]
pub struct CandidateIndex {
    entries: Vec<IndexedProduct>,
}

impl CandidateIndex {
    /// Read the catalog once and profile every active product.
    pub fn build(
        catalog: &dyn ProductCatalog,
        vocabulary: &Vocabulary,
    ) -> Result<Self, CatalogError> {
        Ok(Self::from_products(
            catalog.active_products()?,
            vocabulary,
        ))
    }

    pub fn from_products(products: Vec<CanonicalProduct>, vocabulary: &Vocabulary) -> Self {
        let entries = products
            .into_iter()
            .map(|product| IndexedProduct {
                profile: build_profile(&product, vocabulary),
                product,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[IndexedProduct] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn build_profile(product: &CanonicalProduct, vocabulary: &Vocabulary) -> TokenProfile {
    let mut tokens =
        normalizer::normalize_tokens(&format!("{} {}", product.brand, product.name), vocabulary);

    let brand_slug = normalizer::slugify(&product.brand);
    if !brand_slug.is_empty() {
        tokens.insert(brand_slug.clone());
    }

    if let Some(weight) = product.weight_grams {
        tokens.insert(weight.to_string());
        tokens.insert(format!("{weight}g"));
    }

    let full_slug = match product.weight_grams {
        Some(weight) => normalizer::slugify(&format!(
            "{} {} {}g",
            product.brand, product.name, weight
        )),
        None => normalizer::slugify(&format!("{} {}", product.brand, product.name)),
    };

    TokenProfile {
        tokens,
        weight_grams: product.weight_grams,
        brand_slug,
        full_slug,
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
