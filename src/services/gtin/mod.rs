//! Barcode identifier canonicalization and check-digit validation.
//!
//! Accepts GTIN-8/12/13/14 input with arbitrary separators; a 12-digit code
//! is treated as UPC-A and widened to EAN-13 before validation. The
//! canonical 14-digit form, never the raw scan, is the catalog join key.

use std::fmt;

use serde::Serialize;

use crate::types::errors::GtinError;
use crate::CANONICAL_GTIN_LEN;

const ACCEPTED_LENGTHS: &[usize] = &[8, 13, 14];

/// A checksum-validated identifier in canonical 14-digit form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalGtin(String);

impl CanonicalGtin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalGtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a free-form barcode string.
pub fn canonicalize(raw: &str) -> Result<CanonicalGtin, GtinError> {
    let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    // UPC-A is EAN-13 with an implicit leading zero.
    if digits.len() == 12 {
        digits.insert(0, '0');
    }

    if !ACCEPTED_LENGTHS.contains(&digits.len()) {
        return Err(GtinError::UnsupportedLength);
    }
    if !check_digit_valid(&digits) {
        return Err(GtinError::InvalidCheckDigit);
    }

    Ok(CanonicalGtin(format!(
        "{digits:0>width$}",
        width = CANONICAL_GTIN_LEN
    )))
}

/// Mod-10 checksum: weights 3 and 1 alternate starting from the digit
/// adjacent to the check digit.
fn check_digit_valid(digits: &str) -> bool {
    let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    let Some((&check, body)) = values.split_last() else {
        return false;
    };

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, digit)| if i % 2 == 0 { digit * 3 } else { *digit })
        .sum();

    (10 - sum % 10) % 10 == check
}

#[cfg(test)]
#[path = "tests/gtin_tests.rs"]
mod tests;
