//! Status-coded outcomes.
//!
//! Every fallible lookup or parse in quay returns an [`Outcome`]: either the
//! value, or a [`Failure`] carrying exactly one [`ResultStatus`] failure code.
//! Status codes follow a bit-flag convention where all failure codes share the
//! [`ResultStatus::Failed`] marker bit, so a single test distinguishes success
//! from every kind of failure.

use std::fmt;

/// Bit shared by every failure code.
const FAILED_BIT: u8 = 0b1_0000;

/// Status of a completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResultStatus {
    Succeeded = 0b0_0000,
    Failed = 0b1_0000,
    InvalidArgument = 0b1_0001,
    PathDoesNotExist = 0b1_0011,
    ResultNull = 0b1_0100,
    ValueDoesNotExist = 0b1_0101,
    AlreadyExists = 0b1_0110,
    Canceled = 0b1_0111,
    OutOfRange = 0b1_1000,
}

impl ResultStatus {
    /// All status codes, success first.
    pub const ALL: [ResultStatus; 9] = [
        ResultStatus::Succeeded,
        ResultStatus::Failed,
        ResultStatus::InvalidArgument,
        ResultStatus::PathDoesNotExist,
        ResultStatus::ResultNull,
        ResultStatus::ValueDoesNotExist,
        ResultStatus::AlreadyExists,
        ResultStatus::Canceled,
        ResultStatus::OutOfRange,
    ];

    /// Raw bit pattern of this code.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Whether this code carries the shared failure marker.
    pub fn is_failure(self) -> bool {
        self.bits() & FAILED_BIT != 0
    }

    /// Decode a raw bit pattern. Unknown patterns yield `None`.
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.bits() == bits)
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ResultStatus::Succeeded => "succeeded",
            ResultStatus::Failed => "failed",
            ResultStatus::InvalidArgument => "invalid argument",
            ResultStatus::PathDoesNotExist => "path does not exist",
            ResultStatus::ResultNull => "result is null",
            ResultStatus::ValueDoesNotExist => "value does not exist",
            ResultStatus::AlreadyExists => "already exists",
            ResultStatus::Canceled => "canceled",
            ResultStatus::OutOfRange => "out of range",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A failure carrying a genuine failure code.
///
/// Constructing a failure from [`ResultStatus::Succeeded`] is itself a
/// misuse and yields [`ResultStatus::InvalidArgument`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{status}")]
pub struct Failure {
    status: ResultStatus,
}

impl Failure {
    pub fn new(status: ResultStatus) -> Self {
        if status.is_failure() {
            Self { status }
        } else {
            Self {
                status: ResultStatus::InvalidArgument,
            }
        }
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }
}

impl From<ResultStatus> for Failure {
    fn from(status: ResultStatus) -> Self {
        Self::new(status)
    }
}

/// Value-or-failure returned by every fallible lookup and parse.
pub type Outcome<T> = std::result::Result<T, Failure>;

/// Succeed with a value, or fail with [`ResultStatus::ResultNull`] when the
/// value is absent.
pub fn succeed<T>(value: Option<T>) -> Outcome<T> {
    value.ok_or(Failure::new(ResultStatus::ResultNull))
}

/// Status code of an outcome (`Succeeded` for any `Ok`).
pub fn status_of<T>(outcome: &Outcome<T>) -> ResultStatus {
    match outcome {
        Ok(_) => ResultStatus::Succeeded,
        Err(failure) => failure.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeded_is_not_failure() {
        assert!(!ResultStatus::Succeeded.is_failure());
    }

    #[test]
    fn every_other_code_is_failure() {
        for status in ResultStatus::ALL.into_iter().skip(1) {
            assert!(status.is_failure(), "{status:?} should be a failure");
        }
    }

    #[test]
    fn bits_round_trip() {
        for status in ResultStatus::ALL {
            assert_eq!(ResultStatus::from_bits(status.bits()), Some(status));
        }
        assert_eq!(ResultStatus::from_bits(0b1_0010), None);
    }

    #[test]
    fn failure_from_succeeded_is_invalid_argument() {
        let f = Failure::new(ResultStatus::Succeeded);
        assert_eq!(f.status(), ResultStatus::InvalidArgument);
    }

    #[test]
    fn failure_keeps_genuine_code() {
        let f: Failure = ResultStatus::AlreadyExists.into();
        assert_eq!(f.status(), ResultStatus::AlreadyExists);
    }

    #[test]
    fn succeed_none_is_result_null() {
        let r: Outcome<i32> = succeed(None);
        assert_eq!(status_of(&r), ResultStatus::ResultNull);
    }

    #[test]
    fn succeed_some_is_ok() {
        let r = succeed(Some(7));
        assert_eq!(r, Ok(7));
        assert_eq!(status_of(&r), ResultStatus::Succeeded);
    }

    #[test]
    fn failure_display_uses_label() {
        let f = Failure::new(ResultStatus::ValueDoesNotExist);
        assert_eq!(format!("{f}"), "value does not exist");
    }

    #[test]
    fn try_get_style_access() {
        let ok: Outcome<&str> = Ok("x");
        let bad: Outcome<&str> = Err(ResultStatus::OutOfRange.into());
        assert_eq!(ok.ok(), Some("x"));
        assert_eq!(bad.ok(), None);
    }

    #[test]
    #[should_panic]
    fn unwrap_on_failure_panics() {
        let bad: Outcome<i32> = Err(ResultStatus::Failed.into());
        bad.unwrap();
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn failure_never_carries_success(bits in 0u8..32) {
                if let Some(status) = ResultStatus::from_bits(bits) {
                    let f = Failure::new(status);
                    prop_assert!(f.status().is_failure());
                    prop_assert_eq!(status.is_failure(), bits & 0b1_0000 != 0);
                }
            }
        }
    }
}
