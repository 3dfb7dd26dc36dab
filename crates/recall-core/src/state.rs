use std::fmt;
use std::marker::PhantomData;
use std::rc::Weak;

use crate::error::HookError;
use crate::root::RootInner;
use crate::store::SlotAddr;

/// A state change: either the next value, or a function of the previous one.
pub enum Update<T> {
    Value(T),
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Update::With(Box::new(f))
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Update::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Update::With(_) => f.write_str("With(..)"),
        }
    }
}

/// Setter bound to one slot of one root.
///
/// Every call writes the slot and then re-renders the root, even when the
/// new value equals the old one. Once the root is dropped, calls are no-ops.
pub struct Updater<T> {
    root: Weak<RootInner>,
    addr: SlotAddr,
    _marker: PhantomData<fn(T)>,
}

impl<T> Clone for Updater<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            addr: self.addr.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater").field("addr", &self.addr).finish()
    }
}

impl<T: Clone + 'static> Updater<T> {
    pub(crate) fn new(root: Weak<RootInner>, addr: SlotAddr) -> Self {
        Self {
            root,
            addr,
            _marker: PhantomData,
        }
    }

    pub fn addr(&self) -> &SlotAddr {
        &self.addr
    }

    /// Positional index, `None` for keyed state.
    pub fn index(&self) -> Option<usize> {
        match self.addr {
            SlotAddr::Index(i) => Some(i),
            SlotAddr::Key(_) => None,
        }
    }

    pub fn set(&self, value: T) -> Result<(), HookError> {
        self.update(Update::Value(value))
    }

    pub fn set_with(&self, f: impl FnOnce(&T) -> T + 'static) -> Result<(), HookError> {
        self.update(Update::with(f))
    }

    pub fn update(&self, update: impl Into<Update<T>>) -> Result<(), HookError> {
        let Some(root) = self.root.upgrade() else {
            log::error!("updater for {:?} called after its root was dropped", self.addr);
            return Ok(());
        };
        root.write(&self.addr, update.into());
        root.render()
    }
}
