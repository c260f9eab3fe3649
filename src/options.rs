//! Runtime configuration for a validation run.

/// The maximum allowed size of an input document (10MB).
pub const MAX_INPUT_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Knobs accepted by `validate_with_options` and `Tokenizer::with_options`.
///
/// The defaults validate strict JSON of any nesting depth up to
/// `MAX_INPUT_SIZE_BYTES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Reject inputs longer than this many bytes. `None` disables the check.
    pub max_size: Option<usize>,
    /// Reject documents nested deeper than this. `None` means unlimited.
    pub max_depth: Option<usize>,
    /// Treat the two-character sequences `\t`, `\n` and `\r` outside of
    /// strings as whitespace. Some hand-written fixtures embed these
    /// instead of real control characters.
    pub escaped_whitespace: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        ValidatorOptions {
            max_size: Some(MAX_INPUT_SIZE_BYTES),
            max_depth: None,
            escaped_whitespace: false,
        }
    }
}

impl ValidatorOptions {
    pub fn with_max_size(mut self, max_size: Option<usize>) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_escaped_whitespace(mut self, enabled: bool) -> Self {
        self.escaped_whitespace = enabled;
        self
    }
}
