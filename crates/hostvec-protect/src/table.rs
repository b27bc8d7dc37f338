//! Slot+generation table behind [`PreserveList`](crate::PreserveList).
//!
//! Releasing a slot bumps its generation, so a token that was already
//! released no longer matches and its second release is a no-op.

use hostvec_core::ProtectToken;

struct Slot<T> {
    generation: u32,
    entry: Option<T>,
}

/// Token-addressed storage with slot reuse.
pub(crate) struct TokenTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> TokenTable<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Store `entry` and return a token addressing it.
    pub(crate) fn insert(&mut self, entry: T) -> ProtectToken {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return ProtectToken::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        ProtectToken::new(index, 0)
    }

    pub(crate) fn get(&self, token: ProtectToken) -> Option<&T> {
        let slot = self.slots.get(token.slot() as usize)?;
        if slot.generation != token.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    /// Take the entry out, retiring `token`.
    ///
    /// A slot whose generation wraps to 0 is never reused, so a token from
    /// the first epoch cannot resolve again.
    pub(crate) fn remove(&mut self, token: ProtectToken) -> Option<T> {
        let index = token.slot();
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != token.generation() {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free.push(index);
        }
        self.live -= 1;
        Some(entry)
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
