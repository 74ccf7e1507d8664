//! Product identity resolution core for the grocery price tracker.
//!
//! Decides which canonical catalog item a noisy, partial signal refers to:
//! image filenames during bulk import, OCR text from user photos at the
//! point of sale, and scanned barcodes. The web transport, price storage
//! and scraping layers live elsewhere; this crate only consumes a read-only
//! product catalog and a write-only asset store.

pub mod services;
pub mod types;

/// Length of the canonical identifier form used as the catalog join key.
pub const CANONICAL_GTIN_LEN: usize = 14;
