//! Short code generation.
//!
//! Codes are drawn from the URL-safe base64 alphabet (`A-Z`, `a-z`, `0-9`,
//! `-`, `_`). Each base64 symbol encodes exactly six bits, so encoding OS
//! randomness and truncating the result yields characters that are uniform and
//! independent over all 64 symbols.

use base64::Engine as _;

/// Length of generated short codes.
pub const SHORT_CODE_LENGTH: usize = 6;

/// The 64 symbols a short code may contain.
pub const SHORT_CODE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Codes that equal a fixed first path segment of the HTTP API.
///
/// A link stored under one of these could never be reached through
/// `GET /{code}`.
pub const RESERVED_CODES: &[&str] = &["health", "shorten", "api-docs"];

/// Failure of the randomness source.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("system random number generator failed: {0}")]
    Entropy(String),
}

/// Produces candidate short codes.
///
/// Candidates are not guaranteed to be unique; the caller checks them against
/// the store.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> Result<String, GeneratorError>;
}

/// Random code generator backed by the operating system RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(SHORT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> Result<String, GeneratorError> {
        // ceil(length * 6 / 8) bytes cover `length` symbols
        let mut buffer = vec![0u8; (self.length * 6).div_ceil(8)];

        getrandom::fill(&mut buffer).map_err(|e| GeneratorError::Entropy(e.to_string()))?;

        let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buffer);
        code.truncate(self.length);

        Ok(code)
    }
}

/// Returns true if `code` is shadowed by a fixed route.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if `code` has the shape of a generated short code.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH && code.chars().all(|c| SHORT_CODE_ALPHABET.contains(c))
}
