//! Contract tests for DateObject

use builtins::DateObject;

#[test]
fn test_now_is_integral_milliseconds() {
    let now = DateObject::now();
    assert_eq!(now.fract(), 0.0);
    assert!(now > 0.0);
}
