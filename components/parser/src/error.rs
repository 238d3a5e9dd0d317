//! Parser error helpers

use crate::lexer::Token;
use core_types::{ParseError, SourcePosition};

/// Create an unexpected token error
pub fn unexpected_token(
    expected: impl Into<String>,
    got: &Token,
    position: SourcePosition,
) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.into(),
        actual: got.to_string(),
        position,
    }
}
