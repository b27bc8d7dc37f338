//! Scoped protection of one array at a time.

use std::fmt;
use std::rc::Rc;

use hostvec_core::{ArrayId, HostError, ProtectToken, Registry};

/// Holds one protection registration and releases it on drop.
///
/// The guard always covers exactly one array. [`replace`](Self::replace)
/// moves it to a new array by registering the new one first and releasing
/// the old one second, so there is no point at which neither is protected.
///
/// Because release happens in `Drop`, an early `?` return or a panic
/// unwinding through the owner releases the registration too.
pub struct Protected {
    registry: Rc<dyn Registry>,
    array: ArrayId,
    token: ProtectToken,
}

impl Protected {
    /// Register `array` with `registry`.
    pub fn new(registry: Rc<dyn Registry>, array: ArrayId) -> Result<Self, HostError> {
        let token = registry.protect(array)?;
        Ok(Self {
            registry,
            array,
            token,
        })
    }

    /// The array currently covered.
    pub fn array(&self) -> ArrayId {
        self.array
    }

    /// The live registration token.
    pub fn token(&self) -> ProtectToken {
        self.token
    }

    /// Move protection to `array`.
    ///
    /// On error the guard still covers the previous array.
    pub fn replace(&mut self, array: ArrayId) -> Result<(), HostError> {
        let token = self.registry.protect(array)?;
        let old = std::mem::replace(&mut self.token, token);
        self.array = array;
        self.registry.release(old);
        Ok(())
    }

    /// Release protection now and return the array, which the caller must
    /// keep reachable some other way.
    pub fn release(self) -> ArrayId {
        // Drop does the release.
        self.array
    }
}

impl Drop for Protected {
    fn drop(&mut self) {
        self.registry.release(self.token);
    }
}

impl fmt::Debug for Protected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Protected")
            .field("array", &self.array)
            .field("token", &self.token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PreserveList;

    fn registry() -> (Rc<PreserveList>, Rc<dyn Registry>) {
        let list = Rc::new(PreserveList::new());
        let dynamic: Rc<dyn Registry> = list.clone();
        (list, dynamic)
    }

    #[test]
    fn drop_releases() {
        let (list, reg) = registry();
        {
            let guard = Protected::new(reg, ArrayId(1)).unwrap();
            assert_eq!(guard.array(), ArrayId(1));
            assert!(list.is_protected(ArrayId(1)));
        }
        assert_eq!(list.live(), 0);
    }

    #[test]
    fn replace_moves_protection() {
        let (list, reg) = registry();
        let mut guard = Protected::new(reg, ArrayId(1)).unwrap();
        guard.replace(ArrayId(2)).unwrap();
        assert!(!list.is_protected(ArrayId(1)));
        assert!(list.is_protected(ArrayId(2)));
        assert_eq!(list.live(), 1);
    }

    #[test]
    fn explicit_release_returns_array() {
        let (list, reg) = registry();
        let guard = Protected::new(reg, ArrayId(9)).unwrap();
        assert_eq!(guard.release(), ArrayId(9));
        assert_eq!(list.live(), 0);
    }

    #[test]
    fn panic_unwind_releases() {
        let (list, reg) = registry();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = Protected::new(reg, ArrayId(3)).unwrap();
            panic!("runtime error while protected");
        }));
        assert!(result.is_err());
        assert_eq!(list.live(), 0);
    }
}
