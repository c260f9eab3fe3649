//! # json-validator
//!
//! `json-validator` decides whether a text document conforms to the JSON
//! grammar. It never builds a value tree: the input is tokenized once and
//! the token sequence is checked once, failing fast on the first problem.
//!
//! ## Pipeline
//!
//! 1. The [`Tokenizer`] walks the bytes left to right and emits
//!    classified tokens, each stamped with the nesting state it was found
//!    in. Malformed strings, escapes, literals and numbers, and unclosed
//!    containers, are *lexical* errors.
//! 2. The [`Validator`] re-walks the tokens and checks that every token
//!    has a legal predecessor and that brackets pair up by type. Violations
//!    are *structural* errors.
//!
//! ## Quick Start
//!
//! ```
//! use json_validator::{is_valid, validate};
//!
//! assert!(is_valid(r#"{"key": "value"}"#));
//! assert!(!is_valid(r#"{"key": "value",}"#));
//!
//! let err = validate("42false").unwrap_err();
//! assert!(err.is_lexical());
//! ```

/// Contains the `ValidationError` type and its error kinds.
pub mod error;
/// Contains `ValidatorOptions` and the default limits.
pub mod options;
/// Contains the generic `Stack` used by both stages.
pub mod stack;
/// Contains the `Token`, `TokenKind` and `TokenState` types.
pub mod token;
/// The context-tracking tokenizer (lexer).
pub mod tokenizer;
/// The grammar-adjacency validator.
pub mod validator;

pub use error::{LexicalErrorKind, StructuralErrorKind, ValidationError};
pub use options::{ValidatorOptions, MAX_INPUT_SIZE_BYTES};
pub use stack::Stack;
pub use token::{Token, TokenKind, TokenState};
pub use tokenizer::Tokenizer;
pub use validator::Validator;

/// Validates `input` with the default options.
///
/// Returns `Ok(())` for a valid document, or the first error found.
///
/// # Examples
/// ```
/// use json_validator::validate;
///
/// assert!(validate("[[[[[\"x\"]]]]]").is_ok());
/// assert!(validate(r#"["a","b",]"#).is_err());
/// ```
pub fn validate(input: &str) -> Result<(), ValidationError> {
    validate_with_options(input, &ValidatorOptions::default())
}

/// Validates `input` honouring the limits and leniencies in `options`.
///
/// # Errors
/// Returns `ValidationError::InputTooLarge` if the input exceeds
/// `options.max_size` *before* tokenizing begins.
pub fn validate_with_options(
    input: &str,
    options: &ValidatorOptions,
) -> Result<(), ValidationError> {
    check_size(input, options)?;
    let tokens = tokenizer::tokenize_with_options(input, options)?;
    Validator::new(&tokens).validate()
}

/// Returns `true` if `input` is a valid JSON document.
pub fn is_valid(input: &str) -> bool {
    validate(input).is_ok()
}

/// Tokenizes `input` with the default options without validating it.
///
/// # Examples
/// ```
/// use json_validator::{tokenize, TokenKind, TokenState};
///
/// let tokens = tokenize(r#"{"a": 1}"#).unwrap();
/// assert_eq!(tokens[1].kind, TokenKind::NameString);
/// assert_eq!(tokens[1].literal, "a");
/// assert_eq!(tokens[1].context, TokenState::InsideObject);
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ValidationError> {
    tokenize_with_options(input, &ValidatorOptions::default())
}

/// Tokenizes `input` honouring `options` without validating it.
pub fn tokenize_with_options<'a>(
    input: &'a str,
    options: &ValidatorOptions,
) -> Result<Vec<Token<'a>>, ValidationError> {
    check_size(input, options)?;
    tokenizer::tokenize_with_options(input, options)
}

fn check_size(input: &str, options: &ValidatorOptions) -> Result<(), ValidationError> {
    match options.max_size {
        Some(limit) if input.len() > limit => Err(ValidationError::InputTooLarge {
            size: input.len(),
            limit,
        }),
        _ => Ok(()),
    }
}
