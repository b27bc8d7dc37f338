//! Buffered forward iteration.
//!
//! Opaque arrays charge a host call per element. [`BlockIter`] instead
//! fetches a window of up to `block_len` elements with one region call and
//! serves reads from that window until the position leaves it. Materialized
//! arrays skip the buffer and read straight from the pointer.

use std::iter::FusedIterator;

use hostvec_core::{Element, Representation};
use smallvec::SmallVec;

use crate::error::VectorError;
use crate::raw::Access;
use crate::view::View;

/// Forward-only iterator over a vector's elements.
///
/// Yields `Err` at most once, if a region fetch fails, and then ends. A
/// fresh iterator is needed to start again.
pub struct BlockIter<'a, T: Element> {
    view: View<'a, T>,
    pos: usize,
    /// Valid for positions `block_start..block_start + buf.len()`.
    buf: SmallVec<[T; 64]>,
    block_start: usize,
}

impl<'a, T: Element> BlockIter<'a, T> {
    pub(crate) fn new(view: View<'a, T>) -> Self {
        Self {
            view,
            pos: 0,
            buf: SmallVec::new(),
            block_start: 0,
        }
    }

    /// Current logical position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether reads are served through the block buffer.
    pub fn is_buffered(&self) -> bool {
        self.view.access.representation() == Some(Representation::Opaque)
    }

    fn in_block(&self, pos: usize) -> bool {
        pos >= self.block_start && pos - self.block_start < self.buf.len()
    }

    fn refill(&mut self, pos: usize) -> Result<(), VectorError> {
        let Access::Indexed(array) = self.view.access else {
            return Ok(());
        };
        let want = self.view.block_len.min(self.view.len - pos);
        self.buf.clear();
        self.buf.resize(want, T::default());
        let got = T::region(self.view.host, array, pos, &mut self.buf)?;
        self.buf.truncate(got);
        self.block_start = pos;
        tracing::trace!(%array, start = pos, len = got, "block refill");
        // Short reads are fine; the next position refills. An empty one
        // would never make progress.
        if got == 0 {
            return Err(VectorError::HostContract {
                reason: format!("region read of {array} at {pos} copied no elements"),
            });
        }
        Ok(())
    }
}

impl<T: Element> Iterator for BlockIter<'_, T> {
    type Item = Result<T, VectorError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.pos;
        if pos >= self.view.len {
            return None;
        }
        if let Access::Indexed(_) = self.view.access {
            if !self.in_block(pos) {
                if let Err(e) = self.refill(pos) {
                    self.pos = self.view.len;
                    return Some(Err(e));
                }
            }
            self.pos += 1;
            return Some(Ok(self.buf[pos - self.block_start]));
        }
        self.pos += 1;
        Some(self.view.at(pos))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.view.len - self.pos;
        (rest, Some(rest))
    }
}

impl<T: Element> ExactSizeIterator for BlockIter<'_, T> {}

impl<T: Element> FusedIterator for BlockIter<'_, T> {}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use hostvec_core::{Registry, Representation};
    use hostvec_test_utils::MockHost;

    use crate::config::VectorConfig;
    use crate::runtime::Runtime;
    use crate::vector::{Doubles, Integers};

    fn runtime(block_len: usize) -> (Rc<MockHost>, Runtime) {
        let host = Rc::new(MockHost::new());
        let registry: Rc<dyn Registry> = Rc::new(hostvec_protect::PreserveList::new());
        let config = VectorConfig {
            block_len,
            ..VectorConfig::default()
        };
        let rt = Runtime::with_config(host.clone(), registry, config).unwrap();
        (host, rt)
    }

    fn values(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 * 0.5).collect()
    }

    #[test]
    fn opaque_iteration_reads_in_blocks() {
        let (host, rt) = runtime(64);
        let a = host.real_array(&values(200), Representation::Opaque);
        let v = Doubles::from_handle(&rt, a).unwrap();
        host.reset_stats();

        let got: Vec<f64> = v.iter().map(Result::unwrap).collect();
        assert_eq!(got, values(200));
        let stats = host.stats();
        assert_eq!(stats.region_reads, 4);
        assert_eq!(stats.element_reads, 0);
    }

    #[test]
    fn block_len_is_configurable() {
        let (host, rt) = runtime(10);
        let a = host.integer_array(&[7; 25], Representation::Opaque);
        let v = Integers::from_handle(&rt, a).unwrap();
        host.reset_stats();
        assert_eq!(v.iter().count(), 25);
        assert_eq!(host.stats().region_reads, 3);
    }

    #[test]
    fn materialized_iteration_skips_the_host() {
        let (host, rt) = runtime(64);
        let a = host.real_array(&values(100), Representation::Materialized);
        let v = Doubles::from_handle(&rt, a).unwrap();
        host.reset_stats();

        let it = v.iter();
        assert!(!it.is_buffered());
        assert_eq!(it.map(Result::unwrap).sum::<f64>(), values(100).iter().sum::<f64>());
        assert_eq!(host.stats().region_reads, 0);
        assert_eq!(host.stats().element_reads, 0);
    }

    #[test]
    fn size_hint_is_exact() {
        let (host, rt) = runtime(4);
        let a = host.integer_array(&[1, 2, 3, 4, 5, 6], Representation::Opaque);
        let v = Integers::from_handle(&rt, a).unwrap();
        let mut it = v.iter();
        assert_eq!(it.len(), 6);
        it.next();
        it.next();
        assert_eq!(it.position(), 2);
        assert_eq!(it.size_hint(), (4, Some(4)));
    }

    #[test]
    fn region_failure_ends_iteration() {
        let (host, rt) = runtime(64);
        let a = host.real_array(&values(3), Representation::Opaque);
        let v = Doubles::from_handle(&rt, a).unwrap();
        host.configure(|c| c.fail_regions = true);

        let mut it = v.iter();
        assert!(it.is_buffered());
        assert!(matches!(
            it.next(),
            Some(Err(crate::VectorError::RuntimeUnwind { .. }))
        ));
        assert!(it.next().is_none());
    }

    #[test]
    fn short_region_reads_refill() {
        let (host, rt) = runtime(64);
        let a = host.real_array(&values(10), Representation::Opaque);
        let v = Doubles::from_handle(&rt, a).unwrap();
        host.configure(|c| c.region_limit = Some(3));
        host.reset_stats();

        assert_eq!(v.to_vec().unwrap(), values(10));
        assert_eq!(host.stats().region_reads, 4);
    }

    #[test]
    fn empty_region_read_is_a_contract_violation() {
        let (host, rt) = runtime(64);
        let a = host.integer_array(&[1, 2, 3], Representation::Opaque);
        let v = Integers::from_handle(&rt, a).unwrap();
        host.configure(|c| c.region_limit = Some(0));

        let mut it = v.iter();
        assert!(matches!(
            it.next(),
            Some(Err(crate::VectorError::HostContract { .. }))
        ));
        assert!(it.next().is_none());
    }

    #[test]
    fn fresh_iterators_restart() {
        let (host, rt) = runtime(2);
        let a = host.integer_array(&[1, 2, 3], Representation::Opaque);
        let v = Integers::from_handle(&rt, a).unwrap();
        let first: Vec<i32> = v.iter().map(Result::unwrap).collect();
        let second: Vec<i32> = v.iter().map(Result::unwrap).collect();
        assert_eq!(first, second);
    }
}
