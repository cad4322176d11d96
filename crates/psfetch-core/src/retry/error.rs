//! Per-attempt error type for retry classification.

use std::fmt;

/// Why a single GET attempt did not produce a usable response.
/// Kept separate from `FetchError` so the retry loop can classify it first.
#[derive(Debug)]
pub enum AttemptError {
    /// Curl reported an error (timeout, connection, bad URL, etc.).
    Curl(curl::Error),
    /// Server answered with a status that is neither 200 nor 404.
    Http(u32),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Curl(e) => write!(f, "{}", e),
            AttemptError::Http(code) => write!(f, "HTTP {}", code),
        }
    }
}

impl std::error::Error for AttemptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttemptError::Curl(e) => Some(e),
            AttemptError::Http(_) => None,
        }
    }
}

/// The retry loop gave up: the last attempt's error and how many attempts ran.
#[derive(Debug)]
pub struct GaveUp {
    pub last: AttemptError,
    pub attempts: u32,
}
