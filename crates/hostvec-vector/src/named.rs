//! Construction from named values.

use hostvec_core::{ArrayId, Element, ElementKind};
use hostvec_protect::Protected;

use crate::error::VectorError;
use crate::runtime::Runtime;
use crate::vector::Vector;
use crate::view::NAMES;
use crate::writable::WritableVector;

/// A value in a named list: a scalar, or a host array whose first element
/// is taken as the scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NamedValue<T> {
    /// Used as is.
    Scalar(T),
    /// Unwrapped to its first element. Must be of the vector's kind.
    Array(ArrayId),
}

impl<T: Element> NamedValue<T> {
    fn resolve(self, rt: &Runtime) -> Result<T, VectorError> {
        match self {
            Self::Scalar(value) => Ok(value),
            Self::Array(array) => Vector::<T>::from_handle(rt, array)?.at(0),
        }
    }
}

impl<T: Element> From<T> for NamedValue<T> {
    fn from(value: T) -> Self {
        Self::Scalar(value)
    }
}

/// One `name = value` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedArg<T> {
    /// Element name.
    pub name: String,
    /// Element value.
    pub value: NamedValue<T>,
}

impl<T> NamedArg<T> {
    /// Pair `name` with `value`.
    pub fn new(name: impl Into<String>, value: impl Into<NamedValue<T>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<T: Element> WritableVector<T> {
    /// A vector holding the values of `args` in order, with a names
    /// attribute holding their names.
    ///
    /// Any failure, including one while unwrapping an array value, releases
    /// everything protected so far before it propagates.
    pub fn from_named(rt: &Runtime, args: &[NamedArg<T>]) -> Result<Self, VectorError> {
        let mut v = Self::with_capacity(rt, args.len())?;
        let Some(data) = v.array() else {
            unreachable!("with_capacity always allocates");
        };
        let host = rt.host();
        let names = host.allocate(ElementKind::Character, args.len())?;
        let names_guard = Protected::new(rt.registry().clone(), names)?;
        host.set_attrib(data, NAMES, names)?;
        drop(names_guard);

        for (i, arg) in args.iter().enumerate() {
            v.push(arg.value.resolve(rt)?)?;
            host.set_string_elt(names, i, &arg.name);
        }
        tracing::trace!(%data, %names, len = args.len(), "built named {}", T::LABEL);
        Ok(v)
    }
}
