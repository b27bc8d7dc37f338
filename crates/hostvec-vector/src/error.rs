//! Errors surfaced by typed vectors.

use std::error::Error;
use std::fmt;

use hostvec_core::{ElementKind, HostError};

/// Errors from vector construction, checked access and growth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VectorError {
    /// The array's kind tag is not the vector's element kind. Raised only at
    /// construction.
    TypeMismatch {
        /// Kind the vector holds.
        expected: ElementKind,
        /// Kind the array carries.
        actual: ElementKind,
    },
    /// Checked access outside `0..len`. Never mutates the vector.
    OutOfRange {
        /// Vector family label, e.g. `"doubles"`.
        label: &'static str,
        /// Requested position.
        index: usize,
        /// Length at the time of the access.
        len: usize,
    },
    /// The host could not allocate or resize. The vector is unchanged.
    AllocationFailure {
        /// Element kind of the failed request.
        kind: ElementKind,
        /// Requested length.
        requested: usize,
    },
    /// The host raised its own error during a call from this layer. Any
    /// protection acquired by the failed operation has been released.
    RuntimeUnwind {
        /// The host's message.
        reason: String,
    },
    /// The host returned without error but broke the [`Host`] contract, for
    /// example a region read that copied nothing while elements remained.
    ///
    /// [`Host`]: hostvec_core::Host
    HostContract {
        /// What the host did wrong.
        reason: String,
    },
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, actual } => {
                write!(f, "invalid array type: expected {expected}, got {actual}")
            }
            Self::OutOfRange { label, index, len } => {
                write!(f, "{label}: index {index} out of range for length {len}")
            }
            Self::AllocationFailure { kind, requested } => {
                write!(f, "cannot allocate {kind} array of length {requested}")
            }
            Self::RuntimeUnwind { reason } => write!(f, "runtime error: {reason}"),
            Self::HostContract { reason } => write!(f, "host contract violated: {reason}"),
        }
    }
}

impl Error for VectorError {}

impl From<HostError> for VectorError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::AllocationFailed { kind, requested } => {
                Self::AllocationFailure { kind, requested }
            }
            HostError::Unwind { reason } => Self::RuntimeUnwind { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_errors_map_one_to_one() {
        let e: VectorError = HostError::AllocationFailed {
            kind: ElementKind::Real,
            requested: 8,
        }
        .into();
        assert_eq!(
            e,
            VectorError::AllocationFailure {
                kind: ElementKind::Real,
                requested: 8
            }
        );
        let e: VectorError = HostError::Unwind {
            reason: "boom".into(),
        }
        .into();
        assert_eq!(e.to_string(), "runtime error: boom");
    }

    #[test]
    fn out_of_range_message_names_the_family() {
        let e = VectorError::OutOfRange {
            label: "logicals",
            index: 3,
            len: 3,
        };
        assert_eq!(e.to_string(), "logicals: index 3 out of range for length 3");
    }
}
