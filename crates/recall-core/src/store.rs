use std::any::{Any, type_name};
use std::collections::HashMap;

/// Where a slot lives: its position in the pass, or an explicit key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotAddr {
    Index(usize),
    Key(String),
}

pub struct Slot {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl Slot {
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Ordered state slots plus the cursor of the pass in progress.
///
/// The Nth `claim` after a `reset_cursor` always lands on slot N. Slots are
/// created on first access and never evicted.
#[derive(Default)]
pub struct SlotStore {
    slots: Vec<Slot>,
    cursor: usize,
    keyed: HashMap<String, Slot>,
}

impl SlotStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn keyed_len(&self) -> usize {
        self.keyed.len()
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Drops every slot, positional and keyed, and rewinds the cursor.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.keyed.clear();
        self.cursor = 0;
    }

    /// Reads (or creates) the slot under the cursor, then advances it.
    ///
    /// `init` only runs when the slot does not exist yet, or when it holds a
    /// different type than `T` (order changed between passes).
    pub fn claim<T: Clone + 'static>(&mut self, init: impl FnOnce() -> T) -> (usize, T) {
        let index = self.cursor;
        self.cursor += 1;

        if index >= self.slots.len() {
            let value = init();
            self.slots.push(Slot::new(value.clone()));
            return (index, value);
        }

        if let Some(value) = self.slots[index].get::<T>() {
            return (index, value.clone());
        }

        log::warn!(
            "use_state: slot {} held {} but {} was requested; replacing. \
             Hook calls must happen in the same order on every pass.",
            index,
            self.slots[index].type_name(),
            type_name::<T>()
        );
        let value = init();
        self.slots[index] = Slot::new(value.clone());
        (index, value)
    }

    /// Keyed counterpart of `claim`; leaves the cursor untouched.
    pub fn claim_keyed<T: Clone + 'static>(&mut self, key: &str, init: impl FnOnce() -> T) -> T {
        if let Some(existing) = self.keyed.get(key) {
            if let Some(value) = existing.get::<T>() {
                return value.clone();
            }
            log::warn!(
                "use_state_with_key: key '{}' held {} but {} was requested; replacing.",
                key,
                existing.type_name(),
                type_name::<T>()
            );
        }

        let value = init();
        self.keyed.insert(key.to_owned(), Slot::new(value.clone()));
        value
    }

    pub fn slot(&self, addr: &SlotAddr) -> Option<&Slot> {
        match addr {
            SlotAddr::Index(i) => self.slots.get(*i),
            SlotAddr::Key(k) => self.keyed.get(k),
        }
    }

    pub fn slot_mut(&mut self, addr: &SlotAddr) -> Option<&mut Slot> {
        match addr {
            SlotAddr::Index(i) => self.slots.get_mut(*i),
            SlotAddr::Key(k) => self.keyed.get_mut(k),
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = (SlotAddr, &Slot)> {
        let positional = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, s)| (SlotAddr::Index(i), s));
        let keyed = self.keyed.iter().map(|(k, s)| (SlotAddr::Key(k.clone()), s));
        positional.chain(keyed)
    }
}
