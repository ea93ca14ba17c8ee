//! Unified error interface for Trellis.
//!
//! Every Trellis error type implements [`ErrorCode`] so that errors can
//! travel as event payloads and still be matched programmatically by
//! observers.
//!
//! # Code Format
//!
//! - **UPPER_SNAKE_CASE**: e.g. `"RUNTIME_UNKNOWN_TYPE"`
//! - **Layer-prefixed**: `MODULE_` for component-level failures,
//!   `RUNTIME_` for orchestrator failures, `EVENT_` for event plumbing
//! - **Stable**: codes are an API contract and never change once shipped
//!
//! # Example
//!
//! ```
//! use trellis_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum ConfigError {
//!     Malformed,
//!     Frozen,
//! }
//!
//! impl ErrorCode for ConfigError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Malformed => "CONFIG_MALFORMED",
//!             Self::Frozen => "CONFIG_FROZEN",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Malformed)
//!     }
//! }
//!
//! assert_eq!(ConfigError::Frozen.code(), "CONFIG_FROZEN");
//! ```

/// Unified error code interface for Trellis errors.
///
/// Implementing this trait gives an error type:
///
/// - a stable, machine-readable code for `"error"` event observers
/// - a recoverability hint for hosts deciding whether to retry or log
///
/// # Recoverability
///
/// An error is recoverable when retrying or a user-side fix can succeed
/// (e.g. a transient component failure). It is not recoverable when the
/// condition is structural: a duplicate registration or a dependency
/// cycle will not resolve on retry.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    ///
    /// # Format
    ///
    /// - UPPER_SNAKE_CASE
    /// - Prefixed with the owning layer (e.g. `"RUNTIME_"`, `"MODULE_"`)
    /// - Stable across versions (changing a code is a breaking change)
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    ///
    /// - `true`: retry may succeed, or the user can take corrective action
    /// - `false`: retry will not help; requires a code or markup change
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows Trellis conventions.
///
/// # Checks
///
/// 1. Code is non-empty
/// 2. Code starts with the expected layer prefix
/// 3. Code is UPPER_SNAKE_CASE
///
/// # Panics
///
/// Panics with a descriptive message if validation fails. Intended for
/// use inside tests.
///
/// # Example
///
/// ```
/// use trellis_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Frozen;
///
/// impl ErrorCode for Frozen {
///     fn code(&self) -> &'static str { "CONFIG_FROZEN" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Frozen, "CONFIG_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");

    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );

    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates multiple error codes at once.
///
/// Use this with a list of every variant of an error enum so new
/// variants cannot ship with a malformed or unprefixed code.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    if s.starts_with('_') || s.ends_with('_') {
        return false;
    }

    if s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
