use super::*;
use crate::types::errors::GtinError;

#[test]
fn test_upc_a_widens_and_pads() {
    let canonical = canonicalize("012345678905").unwrap();
    assert_eq!(canonical.as_str(), "00012345678905");
}

#[test]
fn test_ean13_valid() {
    let canonical = canonicalize("4006381333931").unwrap();
    assert_eq!(canonical.as_str(), "04006381333931");
}

#[test]
fn test_gtin8_valid() {
    let canonical = canonicalize("71234564").unwrap();
    assert_eq!(canonical.as_str(), "00000071234564");
}

#[test]
fn test_gtin14_passthrough() {
    let canonical = canonicalize("00000071234564").unwrap();
    assert_eq!(canonical.as_str(), "00000071234564");
}

#[test]
fn test_separators_are_stripped() {
    let canonical = canonicalize("0 12345-67890 5").unwrap();
    assert_eq!(canonical.as_str(), "00012345678905");
}

#[test]
fn test_invalid_check_digit() {
    // 8 digits with a wrong final digit.
    let error = canonicalize("71234567").unwrap_err();
    assert_eq!(error, GtinError::InvalidCheckDigit);
    assert_eq!(error.to_string(), "Invalid GTIN check digit");
}

#[test]
fn test_unsupported_lengths() {
    for raw in ["", "12345", "123456789", "123456789012345"] {
        let error = canonicalize(raw).unwrap_err();
        assert_eq!(error, GtinError::UnsupportedLength, "input {raw:?}");
        assert_eq!(error.to_string(), "Unsupported GTIN length");
    }
}

#[test]
fn test_canonical_preserves_check_digit() {
    for raw in ["71234564", "012345678905", "4006381333931", "00000071234564"] {
        let canonical = canonicalize(raw).unwrap();
        assert_eq!(canonical.as_str().len(), crate::CANONICAL_GTIN_LEN);
        assert_eq!(
            canonical.as_str().chars().last(),
            raw.chars().last(),
            "check digit must survive canonicalization for {raw}"
        );
    }
}

// Mutating any single digit of a valid code must break validation.
#[test]
fn test_single_digit_mutation_fails() {
    let valid = "4006381333931";
    for position in 0..valid.len() {
        let mut digits: Vec<u8> = valid.bytes().collect();
        digits[position] = b'0' + ((digits[position] - b'0' + 1) % 10);
        let mutated = String::from_utf8(digits).unwrap();
        assert_eq!(
            canonicalize(&mutated).unwrap_err(),
            GtinError::InvalidCheckDigit,
            "mutation at position {position} ({mutated}) must fail"
        );
    }
}
