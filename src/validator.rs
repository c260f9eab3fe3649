//! Contains the `Validator`, the second stage of the pipeline.
//!
//! The tokenizer only knows how deep it is. The validator re-walks the
//! finished token sequence once and checks, for every token, that the
//! token before it may legally precede it. It also keeps a stack of
//! opening brackets so that `[` is closed by `]` and `{` by `}`.

use crate::error::{StructuralErrorKind, ValidationError};
use crate::stack::Stack;
use crate::token::{Token, TokenKind, TokenState};

/// Checks grammar adjacency over a complete token sequence.
pub struct Validator<'t, 'a> {
    tokens: &'t [Token<'a>],
    /// Opening kinds (`OpeningCurly` / `OpeningBracket`) not yet closed.
    openers: Stack<TokenKind>,
}

impl<'t, 'a> Validator<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Validator {
            tokens,
            openers: Stack::new(),
        }
    }

    /// Walks the sequence and returns the first violation, if any.
    ///
    /// An empty sequence is an `EmptyDocument` error: a JSON text holds
    /// exactly one value.
    pub fn validate(mut self) -> Result<(), ValidationError> {
        if self.tokens.is_empty() {
            return Err(ValidationError::structural(
                StructuralErrorKind::EmptyDocument,
                1,
                1,
            ));
        }

        let tokens = self.tokens;
        let mut previous: Option<&Token<'a>> = None;
        for token in tokens {
            self.check(token, previous)?;
            previous = Some(token);
        }

        if !self.openers.is_empty() {
            // Reported at the last token.
            let last = tokens[tokens.len() - 1];
            return Err(ValidationError::structural(
                StructuralErrorKind::UnclosedContainer {
                    depth: self.openers.len(),
                },
                last.line,
                last.column,
            ));
        }
        Ok(())
    }

    fn check(
        &mut self,
        token: &Token<'a>,
        previous: Option<&Token<'a>>,
    ) -> Result<(), ValidationError> {
        let prev_kind = previous.map(|p| p.kind);

        let allowed = match token.kind {
            TokenKind::OpeningCurly => {
                let in_array = self.openers.peek() == Some(&TokenKind::OpeningBracket);
                let allowed = match prev_kind {
                    None | Some(TokenKind::Colon) => true,
                    Some(TokenKind::Comma | TokenKind::OpeningBracket) => in_array,
                    Some(_) => false,
                };
                if allowed {
                    self.openers.push(TokenKind::OpeningCurly);
                }
                allowed
            }
            TokenKind::OpeningBracket => {
                let in_array = self.openers.peek() == Some(&TokenKind::OpeningBracket);
                let allowed = match prev_kind {
                    None | Some(TokenKind::Colon | TokenKind::OpeningBracket) => true,
                    Some(TokenKind::Comma) => in_array,
                    Some(_) => false,
                };
                if allowed {
                    self.openers.push(TokenKind::OpeningBracket);
                }
                allowed
            }
            TokenKind::ClosingCurly => {
                let allowed = matches!(
                    prev_kind,
                    Some(kind) if kind.ends_value() || kind == TokenKind::OpeningCurly
                );
                if allowed {
                    self.close(token, TokenKind::OpeningCurly)?;
                }
                allowed
            }
            TokenKind::ClosingBracket => {
                let allowed = matches!(
                    prev_kind,
                    Some(kind) if kind.ends_value() || kind == TokenKind::OpeningBracket
                );
                if allowed {
                    self.close(token, TokenKind::OpeningBracket)?;
                }
                allowed
            }
            TokenKind::NameString => {
                matches!(prev_kind, Some(TokenKind::OpeningCurly | TokenKind::Comma))
            }
            TokenKind::Colon => prev_kind == Some(TokenKind::NameString),
            TokenKind::Comma => match previous {
                Some(prev) => {
                    prev.context != TokenState::Invalid
                        && token.context != TokenState::Invalid
                        && prev.kind.ends_value()
                }
                None => false,
            },
            TokenKind::ValueString
            | TokenKind::Number
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => match prev_kind {
                Some(TokenKind::Colon) => true,
                Some(TokenKind::Comma | TokenKind::OpeningBracket) => {
                    token.context == TokenState::InsideArray
                }
                // A lone scalar is a complete document.
                None => token.context == TokenState::Invalid,
                Some(_) => false,
            },
            TokenKind::Illegal => {
                return Err(ValidationError::structural(
                    StructuralErrorKind::IllegalToken,
                    token.line,
                    token.column,
                ));
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(ValidationError::structural(
                StructuralErrorKind::UnexpectedPredecessor {
                    token: token.kind,
                    predecessor: prev_kind,
                },
                token.line,
                token.column,
            ))
        }
    }

    /// Pops the opener stack for a closer and checks the bracket type.
    fn close(&mut self, token: &Token<'a>, expected: TokenKind) -> Result<(), ValidationError> {
        match self.openers.pop() {
            Some(opener) if opener == expected => Ok(()),
            Some(opener) => Err(ValidationError::structural(
                StructuralErrorKind::MismatchedBracket {
                    expected: opener,
                    found: token.kind,
                },
                token.line,
                token.column,
            )),
            None => Err(ValidationError::structural(
                StructuralErrorKind::UnexpectedCloser(token.kind),
                token.line,
                token.column,
            )),
        }
    }
}

/// Validates a finished token sequence.
pub fn validate_tokens(tokens: &[Token<'_>]) -> Result<(), ValidationError> {
    Validator::new(tokens).validate()
}
