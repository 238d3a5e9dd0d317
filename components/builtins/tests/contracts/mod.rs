//! Contract tests for builtins component
//!
//! These tests pin the behaviour scripts observe through the four namespaces.

mod array_prototype_tests;
mod date_object_tests;
mod math_object_tests;
mod string_prototype_tests;
