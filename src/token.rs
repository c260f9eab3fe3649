//! Defines the `Token`, `TokenKind` and `TokenState` types.
//!
//! These are the intermediate representation handed from the
//! `Tokenizer` (lexer) to the `Validator`. Kinds and states are small
//! `Copy` enums and are passed around by value.

use std::fmt;

/// The classification of a `Token`.
///
/// Strings are split into `NameString` (an object member name) and
/// `ValueString` (any other string) at tokenization time.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    /// `{`
    OpeningCurly,
    /// `}`
    ClosingCurly,
    /// `[`
    OpeningBracket,
    /// `]`
    ClosingBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// A string in member-name position, e.g. `"key"` in `{"key": 1}`
    NameString,
    /// A string in value position
    ValueString,
    /// A number, e.g. `-12.5e3`
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// A lexeme that matched nothing
    Illegal,
}

impl TokenKind {
    /// Returns `true` for kinds that can end a value: scalars and closers.
    pub fn ends_value(self) -> bool {
        self.is_scalar() || matches!(self, TokenKind::ClosingCurly | TokenKind::ClosingBracket)
    }

    /// Returns `true` for kinds that are complete values on their own.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::ValueString
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::OpeningCurly => "'{'",
            TokenKind::ClosingCurly => "'}'",
            TokenKind::OpeningBracket => "'['",
            TokenKind::ClosingBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::NameString => "member name",
            TokenKind::ValueString => "string value",
            TokenKind::Number => "number",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Illegal => "illegal token",
        };
        f.write_str(name)
    }
}

/// Where a token sits in the nesting structure.
///
/// Bracket tokens carry the `Start*`/`End*` states. Every other token
/// carries the innermost enclosing container, or `Invalid` at top level.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenState {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    InsideObject,
    InsideArray,
    /// No enclosing container.
    Invalid,
}

/// A single token produced by the `Tokenizer`.
///
/// `literal` borrows the exact matched text from the input. For strings
/// it is the content between the quotes, escapes left as written.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'a> {
    /// The classification of the token.
    pub kind: TokenKind,
    /// The matched text.
    pub literal: &'a str,
    /// The nesting state active when the token was produced.
    pub context: TokenState,
    /// The 1-indexed line number where the token starts.
    pub line: usize,
    /// The 1-indexed column number where the token starts.
    pub column: usize,
}

impl<'a> Token<'a> {
    /// Creates a token at line 1, column 1.
    ///
    /// Handy for building token sequences by hand; the tokenizer sets
    /// real positions.
    pub fn new(kind: TokenKind, literal: &'a str, context: TokenState) -> Self {
        Token {
            kind,
            literal,
            context,
            line: 1,
            column: 1,
        }
    }

    /// Returns the same token placed at `line`/`column`.
    pub fn at(self, line: usize, column: usize) -> Self {
        Token {
            line,
            column,
            ..self
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {:?} {:?} {:?}",
            self.line, self.column, self.kind, self.context, self.literal
        )
    }
}
