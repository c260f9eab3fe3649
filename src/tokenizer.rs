//! The byte-based, context-tracking tokenizer (lexer).
//!
//! The tokenizer consumes the raw input `&str` (as `&[u8]`) and produces
//! a stream of `Token`s. Each token is stamped with the nesting state
//! active when it was produced, tracked on a `Stack<TokenState>`. Strings
//! are classified as member names or values on the fly from the
//! preceding token.
//!
//! The first lexical error ends the stream.

use crate::error::{LexicalErrorKind, ValidationError};
use crate::options::ValidatorOptions;
use crate::stack::Stack;
use crate::token::{Token, TokenKind, TokenState};
use memchr::memchr2;

// --- The Lookup Table (LUT) ---
// A 256-entry array classifying every byte that can start a token.
pub(crate) const W: u8 = 1; // Whitespace
pub(crate) const S: u8 = 2; // Structural
pub(crate) const L: u8 = 3; // Literal
pub(crate) const D: u8 = 4; // Digit
pub(crate) const Q: u8 = 5; // Quote

static BYTE_PROPERTIES: [u8; 256] = {
    let mut table = [0; 256];
    // 1: Whitespace
    table[b' ' as usize] = W;
    table[b'\n' as usize] = W;
    table[b'\r' as usize] = W;
    table[b'\t' as usize] = W;

    // 2: Structural
    table[b'{' as usize] = S;
    table[b'}' as usize] = S;
    table[b'[' as usize] = S;
    table[b']' as usize] = S;
    table[b':' as usize] = S;
    table[b',' as usize] = S;

    // 3: Literal
    table[b't' as usize] = L;
    table[b'f' as usize] = L;
    table[b'n' as usize] = L;

    // 5: Quote
    table[b'"' as usize] = Q;

    // 4: Digit (and '-')
    table[b'-' as usize] = D;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = D;
        digit += 1;
    }

    // 0: All other bytes are invalid outside of a string
    table
};

/// The tokenizer. An `Iterator` over `Result<Token, ValidationError>`.
pub struct Tokenizer<'a> {
    /// The input, kept as `&str` so literals can be borrowed from it.
    input: &'a str,
    /// The raw bytes of `input`.
    bytes: &'a [u8],
    /// The current position (index) in `bytes`.
    cursor: usize,
    /// The current line number (1-indexed).
    line: usize,
    /// The current column number (1-indexed, counted in characters).
    column: usize,
    /// Open containers, innermost on top.
    contexts: Stack<TokenState>,
    /// The kind of the last token produced.
    previous: Option<TokenKind>,
    max_depth: Option<usize>,
    escaped_whitespace: bool,
    /// Set once the input is exhausted or an error was returned.
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer with the default options.
    pub fn new(input: &'a str) -> Self {
        Tokenizer::with_options(input, &ValidatorOptions::default())
    }

    /// Creates a tokenizer honouring `options.max_depth` and
    /// `options.escaped_whitespace`. The size limit is checked by the caller.
    pub fn with_options(input: &'a str, options: &ValidatorOptions) -> Self {
        Tokenizer {
            input,
            bytes: input.as_bytes(),
            cursor: 0,
            line: 1,
            column: 1,
            contexts: Stack::new(),
            previous: None,
            max_depth: options.max_depth,
            escaped_whitespace: options.escaped_whitespace,
            finished: false,
        }
    }

    /// The number of containers currently open.
    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    fn error(&self, kind: LexicalErrorKind) -> ValidationError {
        ValidationError::lexical(kind, self.line, self.column)
    }

    /// The innermost open container, or `Invalid` at top level.
    fn current_context(&self) -> TokenState {
        self.contexts.peek().copied().unwrap_or(TokenState::Invalid)
    }

    /// The character starting at the cursor, for error messages.
    fn current_char(&self) -> char {
        self.input
            .get(self.cursor..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or('\0')
    }

    fn unexpected_character(&self) -> ValidationError {
        self.error(LexicalErrorKind::UnexpectedCharacter(self.current_char()))
    }

    fn skip_whitespace(&mut self) {
        while let Some(&byte) = self.bytes.get(self.cursor) {
            if BYTE_PROPERTIES[byte as usize] == W {
                self.advance_byte();
            } else if self.escaped_whitespace
                && byte == b'\\'
                && matches!(self.bytes.get(self.cursor + 1), Some(&(b't' | b'n' | b'r')))
            {
                self.advance_byte();
                self.advance_byte();
            } else {
                break;
            }
        }
    }

    /// Advances the cursor by one byte, updating line/col, and returns the byte.
    /// Assumes the cursor is not at the end.
    #[inline]
    fn advance_byte(&mut self) -> u8 {
        let byte = self.bytes[self.cursor];
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if byte & 0xC0 != 0x80 {
            // UTF-8 continuation bytes don't start a new column.
            self.column += 1;
        }
        self.cursor += 1;
        byte
    }

    /// Numbers and literals must be followed by whitespace, a structural
    /// character or the end of input. Rejects `42false` and `nullx`.
    fn expect_delimiter(&self) -> Result<(), ValidationError> {
        match self.bytes.get(self.cursor) {
            None => Ok(()),
            Some(&byte) if matches!(BYTE_PROPERTIES[byte as usize], W | S) => Ok(()),
            Some(&b'\\') if self.escaped_whitespace => Ok(()),
            Some(_) => Err(self.unexpected_character()),
        }
    }

    fn open(&mut self, state: TokenState) -> Result<(), ValidationError> {
        if let Some(limit) = self.max_depth {
            if self.contexts.len() >= limit {
                return Err(self.error(LexicalErrorKind::NestingTooDeep { limit }));
            }
        }
        self.contexts.push(state);
        Ok(())
    }

    /// Handles `{ } [ ] : ,`. Brackets push/pop the context stack; the
    /// popped value is not checked against the bracket type.
    fn lex_structural(&mut self, byte: u8) -> Result<(TokenKind, TokenState), ValidationError> {
        let lexed = match byte {
            b'{' => {
                self.open(TokenState::InsideObject)?;
                (TokenKind::OpeningCurly, TokenState::StartObject)
            }
            b'[' => {
                self.open(TokenState::InsideArray)?;
                (TokenKind::OpeningBracket, TokenState::StartArray)
            }
            b'}' => {
                self.contexts.pop();
                (TokenKind::ClosingCurly, TokenState::EndObject)
            }
            b']' => {
                self.contexts.pop();
                (TokenKind::ClosingBracket, TokenState::EndArray)
            }
            b':' => (TokenKind::Colon, self.current_context()),
            b',' => (TokenKind::Comma, self.current_context()),
            _ => unreachable!(), // LUT guarantees this
        };
        self.advance_byte();
        Ok(lexed)
    }

    /// Matches `true`, `false` or `null` byte by byte. The first mismatch
    /// is an error; there is no fallback.
    fn lex_literal(&mut self, first: u8) -> Result<(TokenKind, &'a str), ValidationError> {
        let (expected, kind) = match first {
            b't' => ("true", TokenKind::True),
            b'f' => ("false", TokenKind::False),
            b'n' => ("null", TokenKind::Null),
            _ => unreachable!(), // LUT guarantees this
        };

        let start = self.cursor;
        for &expected_byte in expected.as_bytes() {
            if self.bytes.get(self.cursor) != Some(&expected_byte) {
                return Err(self.error(LexicalErrorKind::MisspelledLiteral { expected }));
            }
            self.advance_byte();
        }
        self.expect_delimiter()?;
        Ok((kind, &self.input[start..self.cursor]))
    }

    /// Reads a number lexeme: an optional leading `-`, digits, at most one
    /// `.`, and at most one exponent marker with an optional sign. Digit
    /// placement inside the lexeme is not checked.
    fn lex_number(&mut self) -> Result<(TokenKind, &'a str), ValidationError> {
        let start = self.cursor;
        if self.bytes.get(self.cursor) == Some(&b'-') {
            self.advance_byte();
        }

        let mut seen_dot = false;
        let mut seen_exponent = false;
        while let Some(&byte) = self.bytes.get(self.cursor) {
            match byte {
                b'0'..=b'9' => {}
                b'.' if !seen_dot && !seen_exponent => seen_dot = true,
                b'e' | b'E' if !seen_exponent => {
                    seen_exponent = true;
                    self.advance_byte();
                    if matches!(self.bytes.get(self.cursor), Some(&(b'+' | b'-'))) {
                        self.advance_byte();
                    }
                    continue;
                }
                _ => break,
            }
            self.advance_byte();
        }

        self.expect_delimiter()?;
        Ok((TokenKind::Number, &self.input[start..self.cursor]))
    }

    /// Reads a string. `memchr2` jumps to the next quote or backslash;
    /// the bytes in between are only checked for control characters.
    fn lex_string(&mut self) -> Result<(TokenKind, &'a str), ValidationError> {
        let (open_line, open_column) = (self.line, self.column);
        let unterminated = ValidationError::lexical(
            LexicalErrorKind::UnterminatedString,
            open_line,
            open_column,
        );

        self.advance_byte(); // Consume opening '"'
        let content_start = self.cursor;

        loop {
            let offset = match memchr2(b'"', b'\\', &self.bytes[self.cursor..]) {
                Some(offset) => offset,
                None => return Err(unterminated),
            };
            self.skip_plain(offset)?;

            if self.advance_byte() == b'"' {
                break;
            }
            if self.cursor >= self.bytes.len() {
                return Err(unterminated);
            }
            self.lex_escape()?;
        }

        let literal = &self.input[content_start..self.cursor - 1];
        Ok((self.classify_string(), literal))
    }

    /// Advances over `len` unescaped string bytes.
    fn skip_plain(&mut self, len: usize) -> Result<(), ValidationError> {
        let end = self.cursor + len;
        while self.cursor < end {
            let byte = self.bytes[self.cursor];
            if byte < 0x20 {
                return Err(self.error(LexicalErrorKind::ControlCharacter(byte as char)));
            }
            self.advance_byte();
        }
        Ok(())
    }

    /// Validates the escape after a backslash. The cursor is on the
    /// escaped character.
    fn lex_escape(&mut self) -> Result<(), ValidationError> {
        match self.bytes[self.cursor] {
            b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                self.advance_byte();
            }
            b'u' => {
                self.advance_byte();
                for _ in 0..4 {
                    match self.bytes.get(self.cursor) {
                        Some(byte) if byte.is_ascii_hexdigit() => {
                            self.advance_byte();
                        }
                        _ => return Err(self.error(LexicalErrorKind::InvalidUnicodeEscape)),
                    }
                }
            }
            _ => {
                return Err(self.error(LexicalErrorKind::InvalidEscape(self.current_char())));
            }
        }
        Ok(())
    }

    /// A string directly after `{`, or after `,` inside an object, is a
    /// member name. Everything else is a value.
    fn classify_string(&self) -> TokenKind {
        match self.previous {
            Some(TokenKind::OpeningCurly) => TokenKind::NameString,
            Some(TokenKind::Comma) if self.current_context() == TokenState::InsideObject => {
                TokenKind::NameString
            }
            _ => TokenKind::ValueString,
        }
    }

    fn lex_token(&mut self, byte: u8) -> Result<(TokenKind, &'a str, TokenState), ValidationError> {
        match BYTE_PROPERTIES[byte as usize] {
            S => {
                let start = self.cursor;
                let (kind, context) = self.lex_structural(byte)?;
                Ok((kind, &self.input[start..self.cursor], context))
            }
            L => {
                let (kind, literal) = self.lex_literal(byte)?;
                Ok((kind, literal, self.current_context()))
            }
            D => {
                let (kind, literal) = self.lex_number()?;
                Ok((kind, literal, self.current_context()))
            }
            Q => {
                let (kind, literal) = self.lex_string()?;
                Ok((kind, literal, self.current_context()))
            }
            // Whitespace was skipped; anything left is not JSON.
            _ => Err(self.unexpected_character()),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ValidationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();

        let byte = match self.bytes.get(self.cursor) {
            Some(&byte) => byte,
            None => {
                self.finished = true;
                if self.contexts.is_empty() {
                    return None;
                }
                let depth = self.contexts.len();
                return Some(Err(self.error(LexicalErrorKind::UnclosedContainer { depth })));
            }
        };

        let (line, column) = (self.line, self.column);
        match self.lex_token(byte) {
            Ok((kind, literal, context)) => {
                self.previous = Some(kind);
                Some(Ok(Token {
                    kind,
                    literal,
                    context,
                    line,
                    column,
                }))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

/// Tokenizes the whole input, stopping at the first lexical error.
pub fn tokenize_with_options<'a>(
    input: &'a str,
    options: &ValidatorOptions,
) -> Result<Vec<Token<'a>>, ValidationError> {
    Tokenizer::with_options(input, options).collect()
}

// --- Unit Tests for Tokenizer ---
#[cfg(test)]
mod tests {
    use super::*;

    fn collect_tokens(input: &str) -> Result<Vec<Token<'_>>, ValidationError> {
        Tokenizer::new(input).collect()
    }

    fn collect_kinds(input: &str) -> Result<Vec<TokenKind>, ValidationError> {
        Tokenizer::new(input)
            .map(|res| res.map(|token| token.kind))
            .collect()
    }

    fn lexical_kind(input: &str) -> LexicalErrorKind {
        match collect_tokens(input).unwrap_err() {
            ValidationError::Lexical { kind, .. } => kind,
            other => panic!("expected a lexical error, got {:?}", other),
        }
    }

    #[test]
    fn test_tokenizer_structurals_and_contexts() {
        let tokens = collect_tokens(r#"{"a":[1,2]}"#).unwrap();
        let summary: Vec<(TokenKind, &str, TokenState)> = tokens
            .iter()
            .map(|t| (t.kind, t.literal, t.context))
            .collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::OpeningCurly, "{", TokenState::StartObject),
                (TokenKind::NameString, "a", TokenState::InsideObject),
                (TokenKind::Colon, ":", TokenState::InsideObject),
                (TokenKind::OpeningBracket, "[", TokenState::StartArray),
                (TokenKind::Number, "1", TokenState::InsideArray),
                (TokenKind::Comma, ",", TokenState::InsideArray),
                (TokenKind::Number, "2", TokenState::InsideArray),
                (TokenKind::ClosingBracket, "]", TokenState::EndArray),
                (TokenKind::ClosingCurly, "}", TokenState::EndObject),
            ]
        );
    }

    #[test]
    fn test_tokenizer_top_level_tokens_have_no_context() {
        let tokens = collect_tokens(r#""value""#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::ValueString);
        assert_eq!(tokens[0].literal, "value");
        assert_eq!(tokens[0].context, TokenState::Invalid);

        let tokens = collect_tokens("42").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].context, TokenState::Invalid);
    }

    #[test]
    fn test_tokenizer_literals() {
        let kinds = collect_kinds("[true, false, null]").unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::OpeningBracket,
                TokenKind::True,
                TokenKind::Comma,
                TokenKind::False,
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::ClosingBracket,
            ]
        );
    }

    #[test]
    fn test_tokenizer_literals_are_case_sensitive() {
        assert_eq!(
            lexical_kind("True"),
            LexicalErrorKind::UnexpectedCharacter('T')
        );
        assert_eq!(
            lexical_kind("[NULL]"),
            LexicalErrorKind::UnexpectedCharacter('N')
        );
        assert_eq!(
            lexical_kind("flase"),
            LexicalErrorKind::MisspelledLiteral { expected: "false" }
        );
        assert_eq!(
            lexical_kind("nul"),
            LexicalErrorKind::MisspelledLiteral { expected: "null" }
        );
        assert_eq!(
            lexical_kind("[truex]"),
            LexicalErrorKind::UnexpectedCharacter('x')
        );
    }

    #[test]
    fn test_tokenizer_numbers() {
        let tokens = collect_tokens("[123, -0.5, 1e10, 1e-1, 2E+00, 0.123456789e-12]").unwrap();
        let numbers: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.literal)
            .collect();
        assert_eq!(
            numbers,
            vec!["123", "-0.5", "1e10", "1e-1", "2E+00", "0.123456789e-12"]
        );
    }

    #[test]
    fn test_tokenizer_number_followed_by_letter() {
        let err = collect_tokens("42false").unwrap_err();
        assert!(err.is_lexical());
        assert_eq!(
            err,
            ValidationError::lexical(LexicalErrorKind::UnexpectedCharacter('f'), 1, 3)
        );
    }

    #[test]
    fn test_tokenizer_number_with_two_dots() {
        assert_eq!(
            lexical_kind("12.34.56"),
            LexicalErrorKind::UnexpectedCharacter('.')
        );
        assert_eq!(
            lexical_kind("1e5e5"),
            LexicalErrorKind::UnexpectedCharacter('e')
        );
    }

    #[test]
    fn test_tokenizer_strings_keep_escapes_in_literal() {
        let tokens = collect_tokens(r#"["a\nb", "\"", "\\", "\/", "é", "héllo"]"#).unwrap();
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ValueString)
            .map(|t| t.literal)
            .collect();
        assert_eq!(
            strings,
            vec![r"a\nb", r#"\""#, r"\\", r"\/", r"é", "héllo"]
        );
    }

    #[test]
    fn test_tokenizer_all_escapes() {
        let tokens = collect_tokens(r#""\" \\ \/ \b \f \n \r \t""#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::ValueString);
    }

    #[test]
    fn test_tokenizer_name_and_value_strings() {
        let kinds = collect_kinds(r#"{"k1": "v1", "k2": ["v2", "v3"], "k3": {"k4": "v4"}}"#)
            .unwrap();
        let strings: Vec<TokenKind> = kinds
            .into_iter()
            .filter(|k| matches!(k, TokenKind::NameString | TokenKind::ValueString))
            .collect();
        assert_eq!(
            strings,
            vec![
                TokenKind::NameString,
                TokenKind::ValueString,
                TokenKind::NameString,
                TokenKind::ValueString,
                TokenKind::ValueString,
                TokenKind::NameString,
                TokenKind::NameString,
                TokenKind::ValueString,
            ]
        );
    }

    #[test]
    fn test_tokenizer_string_errors() {
        assert_eq!(
            lexical_kind(r#" "hello "#),
            LexicalErrorKind::UnterminatedString
        );
        assert_eq!(
            lexical_kind(r#""trailing backslash\"#),
            LexicalErrorKind::UnterminatedString
        );
        assert_eq!(lexical_kind(r#" "\q" "#), LexicalErrorKind::InvalidEscape('q'));
        assert_eq!(
            lexical_kind(r#""\u12""#),
            LexicalErrorKind::InvalidUnicodeEscape
        );
        assert_eq!(
            lexical_kind("\"\n\""),
            LexicalErrorKind::ControlCharacter('\n')
        );
    }

    #[test]
    fn test_tokenizer_unterminated_string_points_at_opening_quote() {
        let err = collect_tokens("[\n  \"abc").unwrap_err();
        assert_eq!(err.position(), Some((2, 3)));
    }

    #[test]
    fn test_tokenizer_invalid_char() {
        assert_eq!(lexical_kind("?"), LexicalErrorKind::UnexpectedCharacter('?'));
        assert_eq!(
            lexical_kind("[1, 2, &]"),
            LexicalErrorKind::UnexpectedCharacter('&')
        );
        assert_eq!(
            lexical_kind("{'key': 1}"),
            LexicalErrorKind::UnexpectedCharacter('\'')
        );
        assert_eq!(lexical_kind("[é]"), LexicalErrorKind::UnexpectedCharacter('é'));
    }

    #[test]
    fn test_tokenizer_unclosed_containers() {
        assert_eq!(
            lexical_kind(r#"["Unclosed array""#),
            LexicalErrorKind::UnclosedContainer { depth: 1 }
        );
        assert_eq!(
            lexical_kind(r#"{"a": [{"#),
            LexicalErrorKind::UnclosedContainer { depth: 3 }
        );
    }

    #[test]
    fn test_tokenizer_does_not_check_bracket_types() {
        // Depth balances, so the tokenizer is satisfied; the validator
        // catches the mismatch.
        let kinds = collect_kinds("[}").unwrap();
        assert_eq!(kinds, vec![TokenKind::OpeningBracket, TokenKind::ClosingCurly]);

        // A stray closer pops an empty stack without failing.
        let kinds = collect_kinds("[]]").unwrap();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn test_tokenizer_positions() {
        let tokens = collect_tokens("{\n  \"key\" :\n\t1\n}").unwrap();
        let positions: Vec<(usize, usize)> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(positions, vec![(1, 1), (2, 3), (2, 9), (3, 2), (4, 1)]);
    }

    #[test]
    fn test_tokenizer_stops_after_first_error() {
        let mut tokenizer = Tokenizer::new("[1, ?, 2]");
        assert!(tokenizer.next().unwrap().is_ok());
        assert!(tokenizer.next().unwrap().is_ok());
        assert!(tokenizer.next().unwrap().is_ok());
        assert!(tokenizer.next().unwrap().is_err());
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_tokenizer_escaped_whitespace_option() {
        let input = r#"{\n"key1": true,\n"key2": 101\n}"#;
        assert_eq!(
            lexical_kind(input),
            LexicalErrorKind::UnexpectedCharacter('\\')
        );

        let options = ValidatorOptions::default().with_escaped_whitespace(true);
        let kinds: Vec<TokenKind> = tokenize_with_options(input, &options)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::OpeningCurly,
                TokenKind::NameString,
                TokenKind::Colon,
                TokenKind::True,
                TokenKind::Comma,
                TokenKind::NameString,
                TokenKind::Colon,
                TokenKind::Number,
                TokenKind::ClosingCurly,
            ]
        );
    }

    #[test]
    fn test_tokenizer_max_depth() {
        let options = ValidatorOptions::default().with_max_depth(Some(3));
        assert!(tokenize_with_options("[[[]]]", &options).is_ok());

        let err = tokenize_with_options("[[[[]]]]", &options).unwrap_err();
        assert_eq!(
            err,
            ValidationError::lexical(LexicalErrorKind::NestingTooDeep { limit: 3 }, 1, 4)
        );
    }

    #[test]
    fn test_tokenizer_tracks_depth() {
        let mut tokenizer = Tokenizer::new(r#"{"a": [[1]]}"#);
        let mut depths = Vec::new();
        while let Some(token) = tokenizer.next() {
            token.unwrap();
            depths.push(tokenizer.depth());
        }
        // { "a" : [ [ 1 ] ] }
        assert_eq!(depths, vec![1, 1, 1, 2, 3, 3, 2, 1, 0]);
    }

    #[test]
    fn test_tokenizer_empty_input() {
        assert!(collect_tokens("").unwrap().is_empty());
        assert!(collect_tokens(" \n\t\r ").unwrap().is_empty());
    }
}
