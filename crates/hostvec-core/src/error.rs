//! Failures reported by the host runtime.

use std::error::Error;
use std::fmt;

use crate::kind::ElementKind;

/// Errors the host runtime can signal back across the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The runtime could not satisfy an allocation or resize request.
    AllocationFailed {
        /// Element kind of the requested array.
        kind: ElementKind,
        /// Requested length in elements.
        requested: usize,
    },
    /// The runtime raised its own error and began unwinding.
    Unwind {
        /// The runtime's error message.
        reason: String,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { kind, requested } => {
                write!(f, "cannot allocate {kind} array of length {requested}")
            }
            Self::Unwind { reason } => write!(f, "runtime unwind: {reason}"),
        }
    }
}

impl Error for HostError {}
