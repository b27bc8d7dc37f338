//! Benchmark fixtures for hostvec.
//!
//! - [`fixture`]: a runtime over a [`MockHost`] plus a real array of `len`
//!   deterministic values in the requested representation.
//! - [`ramp`]: the values used for that array.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::rc::Rc;

use hostvec_core::{ArrayId, Representation};
use hostvec_test_utils::{MockHost, MockHostConfig};
use hostvec_vector::Runtime;

/// `len` values of a slow sawtooth, so nothing folds to a constant.
pub fn ramp(len: usize) -> Vec<f64> {
    (0..len).map(|i| (i % 1000) as f64 * 0.25).collect()
}

/// A runtime whose host allocates in `representation`, and a real array
/// holding [`ramp`]`(len)` in that representation.
pub fn fixture(representation: Representation, len: usize) -> (Rc<MockHost>, Runtime, ArrayId) {
    let host = Rc::new(MockHost::with_config(MockHostConfig::uniform(representation)));
    let rt = Runtime::with_preserve_list(host.clone());
    let array = host.real_array(&ramp(len), representation);
    (host, rt, array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostvec_vector::Doubles;

    #[test]
    fn fixture_matches_ramp() {
        for repr in [Representation::Materialized, Representation::Opaque] {
            let (_host, rt, array) = fixture(repr, 1500);
            let v = Doubles::from_handle(&rt, array).unwrap();
            assert_eq!(v.representation(), repr);
            assert_eq!(v.to_vec().unwrap(), ramp(1500));
        }
    }
}
