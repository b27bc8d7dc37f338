//! Three-valued logical scalar.
//!
//! [`Logical`] shares the host's 32-bit logical slot layout so that a
//! materialized logical array can be addressed directly as `*mut Logical`.
//! `NA` is a distinct third state: none of the operators here ever fold it
//! into `TRUE` or `FALSE`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitAnd, BitOr, Not};

/// A logical value: `TRUE`, `FALSE` or `NA`.
///
/// The raw slot value is preserved as read from the host. Any non-zero
/// value other than the `NA` sentinel reads as `TRUE`; equality and hashing
/// use the normalized state.
#[derive(Clone, Copy, Default)]
#[repr(transparent)]
pub struct Logical(i32);

impl Logical {
    /// Raw value of the `NA` sentinel.
    pub const NA_RAW: i32 = i32::MIN;

    /// Logical true.
    pub const TRUE: Self = Self(1);
    /// Logical false.
    pub const FALSE: Self = Self(0);
    /// Missing / unknown.
    pub const NA: Self = Self(Self::NA_RAW);

    /// Wrap a raw host slot value without normalizing it.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw slot value, as the host stores it.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whether this value is `NA`.
    pub const fn is_na(self) -> bool {
        self.0 == Self::NA_RAW
    }

    /// Whether this value is definitely `TRUE`.
    pub const fn is_true(self) -> bool {
        !self.is_na() && self.0 != 0
    }

    /// Whether this value is definitely `FALSE`.
    pub const fn is_false(self) -> bool {
        self.0 == 0
    }

    /// `Some(bool)` for a known value, `None` for `NA`.
    pub const fn to_option(self) -> Option<bool> {
        if self.is_na() {
            None
        } else {
            Some(self.0 != 0)
        }
    }

    fn normalized(self) -> i32 {
        match self.to_option() {
            None => Self::NA_RAW,
            Some(true) => 1,
            Some(false) => 0,
        }
    }
}

impl PartialEq for Logical {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Logical {}

impl Hash for Logical {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl From<bool> for Logical {
    fn from(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl From<Option<bool>> for Logical {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::NA, Self::from)
    }
}

impl From<Logical> for Option<bool> {
    fn from(value: Logical) -> Self {
        value.to_option()
    }
}

impl Not for Logical {
    type Output = Self;

    fn not(self) -> Self {
        match self.to_option() {
            None => Self::NA,
            Some(b) => Self::from(!b),
        }
    }
}

/// Kleene conjunction: `FALSE` dominates, then `NA`.
impl BitAnd for Logical {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        if self.is_false() || rhs.is_false() {
            Self::FALSE
        } else if self.is_na() || rhs.is_na() {
            Self::NA
        } else {
            Self::TRUE
        }
    }
}

/// Kleene disjunction: `TRUE` dominates, then `NA`.
impl BitOr for Logical {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        if self.is_true() || rhs.is_true() {
            Self::TRUE
        } else if self.is_na() || rhs.is_na() {
            Self::NA
        } else {
            Self::FALSE
        }
    }
}

impl fmt::Debug for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_option() {
            None => f.write_str("NA"),
            Some(true) => f.write_str("TRUE"),
            Some(false) => f.write_str("FALSE"),
        }
    }
}
