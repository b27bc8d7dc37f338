//! In-memory host runtime.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ptr::NonNull;

use hostvec_core::{
    ArrayId, ElementKind, Host, HostError, Logical, Registry, Representation, NA_INTEGER,
};
use indexmap::IndexMap;

use crate::config::{HostStats, MockHostConfig};

enum Data {
    Real(Vec<f64>),
    /// Integer and logical arrays share 32-bit slots.
    Int(Vec<i32>),
    Str(Vec<String>),
}

impl Data {
    fn new(kind: ElementKind, len: usize) -> Self {
        match kind {
            ElementKind::Real => Self::Real(vec![0.0; len]),
            ElementKind::Logical | ElementKind::Integer => Self::Int(vec![0; len]),
            ElementKind::Character => Self::Str(vec![String::new(); len]),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Real(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }

    /// Copy of the first `len` slots, padded with the kind's missing value.
    fn resized(&self, kind: ElementKind, len: usize) -> Self {
        match self {
            Self::Real(v) => Self::Real(padded(v, len, f64::NAN)),
            Self::Int(v) => {
                let na = if kind == ElementKind::Logical {
                    Logical::NA_RAW
                } else {
                    NA_INTEGER
                };
                Self::Int(padded(v, len, na))
            }
            Self::Str(v) => Self::Str(padded(v, len, String::from("NA"))),
        }
    }
}

fn padded<T: Clone>(src: &[T], len: usize, fill: T) -> Vec<T> {
    let keep = src.len().min(len);
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&src[..keep]);
    out.resize(len, fill);
    out
}

struct HostArray {
    kind: ElementKind,
    representation: Representation,
    data: Data,
    attribs: IndexMap<String, ArrayId>,
}

struct State {
    next_id: u64,
    arrays: IndexMap<ArrayId, HostArray>,
}

impl State {
    fn get(&self, array: ArrayId) -> &HostArray {
        match self.arrays.get(&array) {
            Some(a) => a,
            None => panic!("{array} is not a live host array"),
        }
    }

    fn get_mut(&mut self, array: ArrayId) -> &mut HostArray {
        match self.arrays.get_mut(&array) {
            Some(a) => a,
            None => panic!("{array} is not a live host array"),
        }
    }

    fn insert(&mut self, array: HostArray) -> ArrayId {
        let id = ArrayId(self.next_id);
        self.next_id += 1;
        self.arrays.insert(id, array);
        id
    }
}

/// A single-threaded in-memory host.
///
/// Arrays live in a table keyed by [`ArrayId`]. Materialized arrays expose
/// their `Vec` buffer through the `*_ptr` calls; opaque arrays return `None`
/// there and are reachable only through element and region calls, each of
/// which is counted in [`HostStats`]. Nothing is reclaimed until
/// [`collect`](MockHost::collect) is called.
pub struct MockHost {
    config: RefCell<MockHostConfig>,
    state: RefCell<State>,
    stats: Cell<HostStats>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::with_config(MockHostConfig::default())
    }

    pub fn with_config(config: MockHostConfig) -> Self {
        Self {
            config: RefCell::new(config),
            state: RefCell::new(State {
                next_id: 1,
                arrays: IndexMap::new(),
            }),
            stats: Cell::new(HostStats::default()),
        }
    }

    /// Adjust the configuration of a live host.
    pub fn configure(&self, f: impl FnOnce(&mut MockHostConfig)) {
        f(&mut self.config.borrow_mut());
    }

    pub fn stats(&self) -> HostStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(HostStats::default());
    }

    fn bump(&self, f: impl FnOnce(&mut HostStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    // ── Fixtures ────────────────────────────────────────────────────

    /// Create a real array holding `values`.
    pub fn real_array(&self, values: &[f64], representation: Representation) -> ArrayId {
        self.fixture(
            ElementKind::Real,
            Data::Real(values.to_vec()),
            representation,
        )
    }

    /// Create an integer array holding `values`.
    pub fn integer_array(&self, values: &[i32], representation: Representation) -> ArrayId {
        self.fixture(
            ElementKind::Integer,
            Data::Int(values.to_vec()),
            representation,
        )
    }

    /// Create a logical array holding `values`.
    pub fn logical_array(&self, values: &[Logical], representation: Representation) -> ArrayId {
        let raw = values.iter().map(|l| l.raw()).collect();
        self.fixture(ElementKind::Logical, Data::Int(raw), representation)
    }

    /// Create a character array holding `values`.
    pub fn string_array(&self, values: &[&str]) -> ArrayId {
        let data = Data::Str(values.iter().map(|s| s.to_string()).collect());
        self.fixture(ElementKind::Character, data, Representation::Materialized)
    }

    fn fixture(&self, kind: ElementKind, data: Data, representation: Representation) -> ArrayId {
        self.state.borrow_mut().insert(HostArray {
            kind,
            representation,
            data,
            attribs: IndexMap::new(),
        })
    }

    // ── Inspection ──────────────────────────────────────────────────

    /// Full contents of a real array, bypassing the counters.
    pub fn reals(&self, array: ArrayId) -> Vec<f64> {
        match &self.state.borrow().get(array).data {
            Data::Real(v) => v.clone(),
            _ => panic!("{array} is not a double array"),
        }
    }

    /// Full contents of a logical array, bypassing the counters.
    pub fn logicals(&self, array: ArrayId) -> Vec<Logical> {
        match &self.state.borrow().get(array).data {
            Data::Int(v) => v.iter().copied().map(Logical::from_raw).collect(),
            _ => panic!("{array} is not a logical array"),
        }
    }

    /// Full contents of a character array.
    pub fn strings(&self, array: ArrayId) -> Vec<String> {
        match &self.state.borrow().get(array).data {
            Data::Str(v) => v.clone(),
            _ => panic!("{array} is not a character array"),
        }
    }

    /// The names attribute of `array` as strings.
    pub fn names_of(&self, array: ArrayId) -> Option<Vec<String>> {
        let names = self.attrib(array, "names")?;
        Some(self.strings(names))
    }

    pub fn representation(&self, array: ArrayId) -> Representation {
        self.state.borrow().get(array).representation
    }

    /// Whether `array` has not been reclaimed.
    pub fn is_live(&self, array: ArrayId) -> bool {
        self.state.borrow().arrays.contains_key(&array)
    }

    /// Number of arrays not yet reclaimed.
    pub fn array_count(&self) -> usize {
        self.state.borrow().arrays.len()
    }

    /// Reclaim every array that is neither protected by `roots` nor reachable
    /// through an attribute of a protected array. Returns the number freed.
    pub fn collect(&self, roots: &dyn Registry) -> usize {
        let mut state = self.state.borrow_mut();
        let mut pending: Vec<ArrayId> = state
            .arrays
            .keys()
            .copied()
            .filter(|&a| roots.is_protected(a))
            .collect();
        let mut marked = HashSet::new();
        while let Some(array) = pending.pop() {
            if marked.insert(array) {
                if let Some(a) = state.arrays.get(&array) {
                    pending.extend(a.attribs.values().copied());
                }
            }
        }
        let before = state.arrays.len();
        state.arrays.retain(|id, _| marked.contains(id));
        before - state.arrays.len()
    }

    // ── Internals ───────────────────────────────────────────────────

    fn admit(&self, kind: ElementKind, len: usize) -> Result<(), HostError> {
        let config = self.config.borrow();
        let stats = self.stats.get();
        let over_len = config.max_len.is_some_and(|max| len > max);
        let exhausted = config
            .allocations_before_failure
            .is_some_and(|n| stats.allocations + stats.resizes >= n);
        if over_len || exhausted {
            return Err(HostError::AllocationFailed {
                kind,
                requested: len,
            });
        }
        Ok(())
    }

    fn note_write(&self, array: ArrayId, index: usize) {
        let ordinal = self.stats.get().element_writes;
        self.bump(|s| s.element_writes += 1);
        if self.config.borrow().panic_on_write == Some(ordinal) {
            panic!("host error while writing element {index} of {array}");
        }
    }

    fn check_kind(&self, array: ArrayId, expected: ElementKind) {
        let kind = self.state.borrow().get(array).kind;
        assert_eq!(kind, expected, "{array} has the wrong element kind");
    }

    fn ptr_of<T>(
        &self,
        array: ArrayId,
        pick: impl FnOnce(&mut Data) -> Option<NonNull<T>>,
    ) -> Option<NonNull<T>> {
        self.bump(|s| s.pointer_requests += 1);
        let mut state = self.state.borrow_mut();
        let a = state.get_mut(array);
        if a.representation == Representation::Opaque {
            return None;
        }
        pick(&mut a.data)
    }

    fn int_elt(&self, array: ArrayId, index: usize) -> i32 {
        self.bump(|s| s.element_reads += 1);
        match &self.state.borrow().get(array).data {
            Data::Int(v) => v[index],
            _ => panic!("{array} has no 32-bit slots"),
        }
    }

    fn set_int_elt(&self, array: ArrayId, index: usize, value: i32) {
        self.note_write(array, index);
        match &mut self.state.borrow_mut().get_mut(array).data {
            Data::Int(v) => v[index] = value,
            _ => panic!("{array} has no 32-bit slots"),
        }
    }

    fn region<T: Copy>(
        &self,
        array: ArrayId,
        start: usize,
        buf: &mut [T],
        pick: impl FnOnce(&Data) -> Option<&[T]>,
    ) -> Result<usize, HostError> {
        self.bump(|s| s.region_reads += 1);
        let (fail, limit) = {
            let config = self.config.borrow();
            (config.fail_regions, config.region_limit)
        };
        if fail {
            return Err(HostError::Unwind {
                reason: format!("region read of {array} failed"),
            });
        }
        let state = self.state.borrow();
        let Some(src) = pick(&state.get(array).data) else {
            panic!("{array} has the wrong element kind for this region read");
        };
        let want = limit.map_or(buf.len(), |l| l.min(buf.len()));
        let end = src.len().min(start.saturating_add(want));
        let n = end.saturating_sub(start);
        if n == 0 {
            return Ok(0);
        }
        buf[..n].copy_from_slice(&src[start..start + n]);
        Ok(n)
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MockHost {
    fn allocate(&self, kind: ElementKind, len: usize) -> Result<ArrayId, HostError> {
        self.admit(kind, len)?;
        self.bump(|s| s.allocations += 1);
        let representation = self.config.borrow().representation;
        Ok(self.state.borrow_mut().insert(HostArray {
            kind,
            representation,
            data: Data::new(kind, len),
            attribs: IndexMap::new(),
        }))
    }

    fn resize(&self, array: ArrayId, len: usize) -> Result<ArrayId, HostError> {
        let kind = self.kind(array);
        self.admit(kind, len)?;
        self.bump(|s| s.resizes += 1);
        let representation = self.config.borrow().resized;
        let mut state = self.state.borrow_mut();
        let source = state.get(array);
        let data = source.data.resized(kind, len);
        let names = source.attribs.get("names").copied();

        let mut attribs = IndexMap::new();
        if let Some(names) = names {
            let resized_names = state.get(names).data.resized(ElementKind::Character, len);
            let names_id = state.insert(HostArray {
                kind: ElementKind::Character,
                representation: Representation::Materialized,
                data: resized_names,
                attribs: IndexMap::new(),
            });
            attribs.insert(String::from("names"), names_id);
        }
        Ok(state.insert(HostArray {
            kind,
            representation,
            data,
            attribs,
        }))
    }

    fn kind(&self, array: ArrayId) -> ElementKind {
        self.state.borrow().get(array).kind
    }

    fn length(&self, array: ArrayId) -> usize {
        self.state.borrow().get(array).data.len()
    }

    fn real_ptr(&self, array: ArrayId) -> Option<NonNull<f64>> {
        self.check_kind(array, ElementKind::Real);
        self.ptr_of(array, |data| match data {
            Data::Real(v) => NonNull::new(v.as_mut_ptr()),
            _ => None,
        })
    }

    fn real_elt(&self, array: ArrayId, index: usize) -> f64 {
        self.bump(|s| s.element_reads += 1);
        match &self.state.borrow().get(array).data {
            Data::Real(v) => v[index],
            _ => panic!("{array} is not a double array"),
        }
    }

    fn set_real_elt(&self, array: ArrayId, index: usize, value: f64) {
        self.note_write(array, index);
        match &mut self.state.borrow_mut().get_mut(array).data {
            Data::Real(v) => v[index] = value,
            _ => panic!("{array} is not a double array"),
        }
    }

    fn real_region(
        &self,
        array: ArrayId,
        start: usize,
        buf: &mut [f64],
    ) -> Result<usize, HostError> {
        self.region(array, start, buf, |data| match data {
            Data::Real(v) => Some(v.as_slice()),
            _ => None,
        })
    }

    fn integer_ptr(&self, array: ArrayId) -> Option<NonNull<i32>> {
        self.check_kind(array, ElementKind::Integer);
        self.ptr_of(array, |data| match data {
            Data::Int(v) => NonNull::new(v.as_mut_ptr()),
            _ => None,
        })
    }

    fn integer_elt(&self, array: ArrayId, index: usize) -> i32 {
        self.int_elt(array, index)
    }

    fn set_integer_elt(&self, array: ArrayId, index: usize, value: i32) {
        self.set_int_elt(array, index, value);
    }

    fn integer_region(
        &self,
        array: ArrayId,
        start: usize,
        buf: &mut [i32],
    ) -> Result<usize, HostError> {
        self.region(array, start, buf, |data| match data {
            Data::Int(v) => Some(v.as_slice()),
            _ => None,
        })
    }

    fn logical_ptr(&self, array: ArrayId) -> Option<NonNull<i32>> {
        self.check_kind(array, ElementKind::Logical);
        self.ptr_of(array, |data| match data {
            Data::Int(v) => NonNull::new(v.as_mut_ptr()),
            _ => None,
        })
    }

    fn logical_elt(&self, array: ArrayId, index: usize) -> i32 {
        self.int_elt(array, index)
    }

    fn set_logical_elt(&self, array: ArrayId, index: usize, value: i32) {
        self.set_int_elt(array, index, value);
    }

    fn logical_region(
        &self,
        array: ArrayId,
        start: usize,
        buf: &mut [i32],
    ) -> Result<usize, HostError> {
        self.region(array, start, buf, |data| match data {
            Data::Int(v) => Some(v.as_slice()),
            _ => None,
        })
    }

    fn string_elt(&self, array: ArrayId, index: usize) -> String {
        match &self.state.borrow().get(array).data {
            Data::Str(v) => v[index].clone(),
            _ => panic!("{array} is not a character array"),
        }
    }

    fn set_string_elt(&self, array: ArrayId, index: usize, value: &str) {
        match &mut self.state.borrow_mut().get_mut(array).data {
            Data::Str(v) => v[index] = value.to_string(),
            _ => panic!("{array} is not a character array"),
        }
    }

    fn attrib(&self, array: ArrayId, name: &str) -> Option<ArrayId> {
        self.state.borrow().get(array).attribs.get(name).copied()
    }

    fn set_attrib(&self, array: ArrayId, name: &str, value: ArrayId) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        if !state.arrays.contains_key(&value) {
            return Err(HostError::Unwind {
                reason: format!("attribute value {value} is not a live array"),
            });
        }
        state
            .get_mut(array)
            .attribs
            .insert(name.to_string(), value);
        Ok(())
    }
}
