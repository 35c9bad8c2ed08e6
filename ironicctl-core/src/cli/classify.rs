//! Map CLI failures to retry classes
//!
//! The retry loop never inspects error text itself; it branches on the
//! [`ErrorClass`] produced here.

use once_cell::sync::Lazy;
use regex::RegexSet;

use super::invoker::InvokeError;

/// Retry class of a failed invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth retrying after a delay (API not up yet, request raced startup)
    Transient,
    /// Retrying cannot help (bad credentials, no executable)
    Fatal,
    /// Not recognized; surfaced to the caller unchanged
    Unknown,
}

static TRANSIENT: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"Connection refused",
        r"\(HTTP 400\)",
        r"Unable to establish connection",
    ])
    .expect("transient patterns are valid")
});

static FATAL: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([r"\(HTTP 401\)", r"\(HTTP 403\)"]).expect("fatal patterns are valid")
});

/// Classify raw error text
pub fn classify_message(message: &str) -> ErrorClass {
    if TRANSIENT.is_match(message) {
        ErrorClass::Transient
    } else if FATAL.is_match(message) {
        ErrorClass::Fatal
    } else {
        ErrorClass::Unknown
    }
}

/// Classify an invocation error
pub fn classify(error: &InvokeError) -> ErrorClass {
    match error {
        InvokeError::NotFound(_) => ErrorClass::Fatal,
        InvokeError::Timeout { .. } => ErrorClass::Unknown,
        other => classify_message(&other.message()),
    }
}
