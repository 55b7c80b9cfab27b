//! Crate error type.
//!
//! Every fallible operation validates its inputs before touching any state, so an
//! `Err` never leaves a policy half-updated.

use thiserror::Error;

/// Errors returned by policies, oracles and the Beta utilities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Unsupported or malformed construction-time configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An argument value is outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two sequences that must line up do not.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The caller broke an ordering or shape contract (e.g. arm universe mismatch).
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Matrix bookkeeping produced a value that should be impossible.
    #[error("numeric invariant violated: {0}")]
    NumericInvariant(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Validate that `time` is a usable round index (`ln(time)` must be defined).
pub(crate) fn check_time(time: u64) -> Result<()> {
    if time == 0 {
        return Err(Error::InvalidArgument(
            "time must be >= 1 (rounds are 1-based)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_kind() {
        let e = Error::LengthMismatch {
            expected: 2,
            actual: 3,
        };
        assert_eq!(e.to_string(), "length mismatch: expected 2, got 3");
        assert!(Error::Config("q".into()).to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn time_zero_is_rejected() {
        assert!(matches!(check_time(0), Err(Error::InvalidArgument(_))));
        assert!(check_time(1).is_ok());
    }
}
