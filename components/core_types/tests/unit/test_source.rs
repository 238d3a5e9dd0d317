//! Unit tests for SourcePosition

use core_types::SourcePosition;

#[test]
fn test_positions_order_by_fields() {
    let a = SourcePosition::new(1, 1, 0);
    let b = SourcePosition::new(1, 1, 0);
    assert_eq!(a, b);
    assert_ne!(a, SourcePosition::new(1, 2, 1));
}

#[test]
fn test_default_position_is_zeroed() {
    let pos = SourcePosition::default();
    assert_eq!((pos.line, pos.column, pos.offset), (0, 0, 0));
}

#[test]
fn test_position_is_copy() {
    let pos = SourcePosition::new(4, 2, 30);
    let copied = pos;
    assert_eq!(pos, copied);
}
