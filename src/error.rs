//! Contains the `ValidationError` type returned by every failed check.
//!
//! Errors fall into two categories: *lexical* errors raised by the
//! tokenizer and *structural* errors raised by the validator. Both carry
//! the line and column (1-indexed) of the offending token.

use crate::token::TokenKind;
use thiserror::Error;

/// The error type for all validation operations.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// The tokenizer could not classify the input.
    #[error("Lexical error at line {line}, column {column}: {kind}")]
    Lexical {
        kind: LexicalErrorKind,
        line: usize,
        column: usize,
    },

    /// The token sequence breaks the JSON grammar.
    #[error("Structural error at line {line}, column {column}: {kind}")]
    Structural {
        kind: StructuralErrorKind,
        line: usize,
        column: usize,
    },

    /// The input was rejected before tokenizing.
    #[error("Input of {size} bytes exceeds the maximum size of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

/// What went wrong while tokenizing.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LexicalErrorKind {
    #[error("unterminated string")]
    UnterminatedString,

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("'\\u' must be followed by four hex digits")]
    InvalidUnicodeEscape,

    #[error("unescaped control character {0:?} in string")]
    ControlCharacter(char),

    #[error("expected '{expected}'")]
    MisspelledLiteral { expected: &'static str },

    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    #[error("{depth} unclosed container(s) at end of input")]
    UnclosedContainer { depth: usize },

    #[error("maximum nesting depth of {limit} exceeded")]
    NestingTooDeep { limit: usize },
}

/// What went wrong while validating the token sequence.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StructuralErrorKind {
    #[error("{token} cannot follow {}", describe_predecessor(.predecessor))]
    UnexpectedPredecessor {
        token: TokenKind,
        predecessor: Option<TokenKind>,
    },

    #[error("{found} does not close {expected}")]
    MismatchedBracket {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("{0} has no matching opener")]
    UnexpectedCloser(TokenKind),

    #[error("{depth} unclosed container(s) at end of input")]
    UnclosedContainer { depth: usize },

    #[error("illegal token")]
    IllegalToken,

    #[error("empty document")]
    EmptyDocument,
}

fn describe_predecessor(predecessor: &Option<TokenKind>) -> String {
    match predecessor {
        Some(kind) => kind.to_string(),
        None => "the start of the document".to_string(),
    }
}

impl ValidationError {
    pub(crate) fn lexical(kind: LexicalErrorKind, line: usize, column: usize) -> Self {
        ValidationError::Lexical { kind, line, column }
    }

    pub(crate) fn structural(kind: StructuralErrorKind, line: usize, column: usize) -> Self {
        ValidationError::Structural { kind, line, column }
    }

    /// Returns `true` if the error was raised by the tokenizer.
    pub fn is_lexical(&self) -> bool {
        matches!(self, ValidationError::Lexical { .. })
    }

    /// Returns `true` if the error was raised by the validator.
    pub fn is_structural(&self) -> bool {
        matches!(self, ValidationError::Structural { .. })
    }

    /// The `(line, column)` of the offending token, if there is one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            ValidationError::Lexical { line, column, .. }
            | ValidationError::Structural { line, column, .. } => Some((*line, *column)),
            ValidationError::InputTooLarge { .. } => None,
        }
    }
}
