//! Contract tests for StringPrototype

use builtins::StringPrototype;

#[test]
fn test_slice_positive_range() {
    assert_eq!(StringPrototype::slice("orchard", 0.0, Some(3.0)), "orc");
}

#[test]
fn test_slice_negative_start() {
    assert_eq!(StringPrototype::slice("orchard", -4.0, None), "hard");
}

#[test]
fn test_slice_fractional_indices_truncate() {
    assert_eq!(StringPrototype::slice("orchard", 1.9, Some(3.2)), "rc");
}

#[test]
fn test_slice_nan_start_is_zero() {
    assert_eq!(StringPrototype::slice("abc", f64::NAN, None), "abc");
}

#[test]
fn test_replace_first_occurrence() {
    assert_eq!(StringPrototype::replace("aaa", "a", "b"), "baa");
}

#[test]
fn test_replace_empty_search_prepends() {
    assert_eq!(StringPrototype::replace("abc", "", "-"), "-abc");
}

#[test]
fn test_case_mapping() {
    assert_eq!(StringPrototype::to_upper_case("Apple"), "APPLE");
    assert_eq!(StringPrototype::to_lower_case("Apple"), "apple");
}

#[test]
fn test_length() {
    assert_eq!(StringPrototype::length(""), 0);
    assert_eq!(StringPrototype::length("apple"), 5);
}
