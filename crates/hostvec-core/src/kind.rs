//! Element kind tags carried by every host array.

use std::fmt;

/// The declared element kind of a host array.
///
/// Every array the host hands out carries exactly one of these tags. Typed
/// vectors check the tag once at construction and never again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Three-valued logical (`TRUE`, `FALSE`, `NA`), 32-bit storage.
    Logical,
    /// 32-bit signed integer with `i32::MIN` reserved for `NA`.
    Integer,
    /// 64-bit IEEE float.
    Real,
    /// Character strings. Used for the names attribute; no typed vector.
    Character,
}

impl ElementKind {
    /// Size in bytes of one element slot in the host's contiguous layout.
    ///
    /// Character arrays hold references, so they report pointer width.
    pub fn slot_bytes(&self) -> usize {
        match self {
            Self::Logical | Self::Integer => std::mem::size_of::<i32>(),
            Self::Real => std::mem::size_of::<f64>(),
            Self::Character => std::mem::size_of::<usize>(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Logical => "logical",
            Self::Integer => "integer",
            Self::Real => "double",
            Self::Character => "character",
        };
        f.write_str(name)
    }
}
