//! Tests for namespace classification
//!
//! These tests verify:
//! - Extraction of `<module>` from `s/k:<module>/...`
//! - Anchoring at the start of the key
//! - Fallback to `misc` for plain and malformed keys

use atlaskv_stats::stats::{classify, parse_namespace, MISC_LABEL};

// =============================================================================
// Namespaced Keys
// =============================================================================

#[test]
fn test_classify_namespaced_key() {
    assert_eq!(classify(b"s/k:bank/addr1"), "bank");
    assert_eq!(classify(b"s/k:staking/validators/abc"), "staking");
}

#[test]
fn test_classify_word_characters() {
    assert_eq!(classify(b"s/k:ibc_transfer/x"), "ibc_transfer");
    assert_eq!(classify(b"s/k:Mod42/x"), "Mod42");
    assert_eq!(classify(b"s/k:_/x"), "_");
}

#[test]
fn test_classify_binary_suffix() {
    let mut key = b"s/k:acc/".to_vec();
    key.extend_from_slice(&[0x00, 0xff, 0xfe, 0x80]);

    assert_eq!(classify(&key), "acc");
}

#[test]
fn test_classify_name_then_slash_only() {
    assert_eq!(classify(b"s/k:bank/"), "bank");
}

// =============================================================================
// Non-namespaced Keys
// =============================================================================

#[test]
fn test_classify_plain_key_is_misc() {
    assert_eq!(classify(b"other-key"), MISC_LABEL);
    assert_eq!(classify(b""), MISC_LABEL);
    assert_eq!(classify(b"s/latest"), MISC_LABEL);
}

#[test]
fn test_classify_is_anchored() {
    // Contains the pattern, but not at the start.
    assert_eq!(classify(b"xs/k:bank/addr"), MISC_LABEL);
    assert_eq!(classify(b"/s/k:bank/addr"), MISC_LABEL);
}

#[test]
fn test_classify_prefix_is_case_sensitive() {
    assert_eq!(classify(b"S/K:bank/addr"), MISC_LABEL);
}

// =============================================================================
// Malformed Keys
// =============================================================================

#[test]
fn test_classify_prefix_only_is_misc() {
    assert_eq!(classify(b"s/k:"), MISC_LABEL);
}

#[test]
fn test_classify_unterminated_name_is_misc() {
    assert_eq!(classify(b"s/k:bank"), MISC_LABEL);
}

#[test]
fn test_classify_non_word_character_is_misc() {
    assert_eq!(classify(b"s/k:ba-nk/addr"), MISC_LABEL);
    assert_eq!(classify(b"s/k:/addr"), MISC_LABEL);
    assert_eq!(classify(b"s/k:bank:addr/x"), MISC_LABEL);
}

#[test]
fn test_parse_namespace_outcomes() {
    assert_eq!(parse_namespace(b"s/k:bank/x"), Ok(Some("bank")));
    assert_eq!(parse_namespace(b"plain"), Ok(None));

    let err = parse_namespace(b"s/k:").unwrap_err();
    assert_eq!(err.reason, "empty module name");

    let err = parse_namespace(b"s/k:bank").unwrap_err();
    assert_eq!(err.reason, "module name not terminated by '/'");
}

// =============================================================================
// Purity
// =============================================================================

#[test]
fn test_classify_is_deterministic() {
    let keys: [&[u8]; 4] = [b"s/k:bank/a", b"misc-key", b"s/k:", b"s/k:gov/1"];
    for key in keys {
        let first = classify(key).to_string();
        for _ in 0..3 {
            assert_eq!(classify(key), first);
        }
    }
}
