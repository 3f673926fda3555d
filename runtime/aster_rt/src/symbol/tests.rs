//! Tests for symbol interning.

use super::*;

#[test]
fn same_name_yields_same_token() {
    let a = symbol("velocity");
    let b = symbol("velocity");
    assert_eq!(a, b);
}

#[test]
fn distinct_names_yield_distinct_tokens() {
    let a = symbol("latitude");
    let b = symbol("longitude");
    assert_ne!(a, b);
}

#[test]
fn tokens_resolve_back_to_their_name() {
    let sym = symbol("heading");
    assert_eq!(sym.name(), "heading");
}

#[test]
fn tokens_are_copy_and_identity_comparable() {
    let a = symbol("altitude");
    let b = a;
    assert_eq!(a, b);
    assert_eq!(format!("{a:?}"), "Symbol(altitude)");
}
