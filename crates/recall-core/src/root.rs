use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::config::RootConfig;
use crate::error::{BoxError, HookError};
use crate::state::{Update, Updater};
use crate::store::{SlotAddr, SlotStore};

pub type RenderFn = Rc<dyn Fn(&Hooks<'_>) -> Result<(), BoxError>>;
pub type PassObserver = Rc<dyn Fn(&PassInfo)>;
pub type ObserverId = usize;

/// What one completed render pass did.
#[derive(Clone, Debug, PartialEq)]
pub struct PassInfo {
    /// 1-based pass number within the root.
    pub pass: u64,
    /// Positional hook calls made by the pass (the cursor when it returned).
    pub hooks_called: usize,
    pub slots: usize,
    pub keyed_slots: usize,
    pub duration: Duration,
}

#[cfg(feature = "inspector")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotInfo {
    pub addr: SlotAddr,
    pub type_name: &'static str,
}

pub(crate) struct RootInner {
    store: RefCell<SlotStore>,
    render_fn: RefCell<Option<RenderFn>>,
    observers: RefCell<Vec<Option<PassObserver>>>,
    config: RootConfig,
    rendering: Cell<bool>,
    pending: Cell<u32>,
    passes: Cell<u64>,
}

/// One independent render root: a slot store, the render function it drives,
/// and the trampoline that re-runs that function whenever state changes.
///
/// Roots never share slots. Cloning a `Root` clones the handle, not the state.
/// A render function that captures its own root keeps it alive forever; use
/// the `Updater`s handed out by `use_state` instead.
#[derive(Clone)]
pub struct Root {
    inner: Rc<RootInner>,
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Root {
    pub fn new() -> Self {
        Self::with_config(RootConfig::default())
    }

    pub fn with_config(config: RootConfig) -> Self {
        Self {
            inner: Rc::new(RootInner {
                store: RefCell::new(SlotStore::with_capacity(config.initial_capacity)),
                render_fn: RefCell::new(None),
                observers: RefCell::new(Vec::new()),
                config,
                rendering: Cell::new(false),
                pending: Cell::new(0),
                passes: Cell::new(0),
            }),
        }
    }

    /// Installs the function every pass runs. Replaces any previous one.
    pub fn set_render(&self, render: impl Fn(&Hooks<'_>) -> Result<(), BoxError> + 'static) {
        *self.inner.render_fn.borrow_mut() = Some(Rc::new(render));
    }

    pub fn with_render(self, render: impl Fn(&Hooks<'_>) -> Result<(), BoxError> + 'static) -> Self {
        self.set_render(render);
        self
    }

    /// Resets the cursor and runs the render function to completion.
    ///
    /// Called from inside a pass (through an updater), the pass is queued and
    /// runs once the current one returns; the error of any queued pass is
    /// reported to the outermost caller.
    pub fn render(&self) -> Result<(), HookError> {
        self.inner.render()
    }

    pub fn config(&self) -> RootConfig {
        self.inner.config
    }

    pub fn cursor(&self) -> usize {
        self.inner.store.borrow().cursor()
    }

    pub fn slot_count(&self) -> usize {
        self.inner.store.borrow().len()
    }

    pub fn keyed_slot_count(&self) -> usize {
        self.inner.store.borrow().keyed_len()
    }

    pub fn pass_count(&self) -> u64 {
        self.inner.passes.get()
    }

    pub fn is_rendering(&self) -> bool {
        self.inner.rendering.get()
    }

    /// Forgets every slot. Updaters handed out before become stale.
    pub fn reset_slots(&self) {
        log::debug!("root: clearing {} slots", self.slot_count());
        self.inner.store.borrow_mut().clear();
    }

    /// Registers a callback that runs after every successful pass.
    pub fn on_pass(&self, f: impl Fn(&PassInfo) + 'static) -> ObserverId {
        let observer: PassObserver = Rc::new(f);
        let mut observers = self.inner.observers.borrow_mut();
        observers.push(Some(observer));
        observers.len() - 1
    }

    /// Unregisters an `on_pass` callback. Returns false if `id` was unknown or
    /// already removed. Ids are never reused.
    pub fn remove_pass_observer(&self, id: ObserverId) -> bool {
        self.inner
            .observers
            .borrow_mut()
            .get_mut(id)
            .and_then(Option::take)
            .is_some()
    }

    #[cfg(feature = "inspector")]
    pub fn inspect(&self) -> Vec<SlotInfo> {
        self.inner
            .store
            .borrow()
            .slots()
            .map(|(addr, slot)| SlotInfo {
                addr,
                type_name: slot.type_name(),
            })
            .collect()
    }
}

/// Marks the root as rendering for as long as it lives, including unwinds.
struct PassGuard<'a> {
    root: &'a RootInner,
}

impl<'a> PassGuard<'a> {
    fn begin(root: &'a RootInner) -> Self {
        root.rendering.set(true);
        PassGuard { root }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.root.rendering.set(false);
        self.root.pending.set(0);
    }
}

impl RootInner {
    pub(crate) fn render(self: &Rc<Self>) -> Result<(), HookError> {
        if self.rendering.get() {
            self.pending.set(self.pending.get().saturating_add(1));
            log::trace!(
                "render requested during pass {}; queued ({} pending)",
                self.passes.get(),
                self.pending.get()
            );
            return Ok(());
        }

        let _guard = PassGuard::begin(self);
        let limit = self.config.max_nested_passes;
        let mut nested = 0u32;
        loop {
            self.run_pass()?;

            let pending = self.pending.get();
            if pending == 0 {
                return Ok(());
            }
            if nested == limit {
                log::error!("render loop exceeded {limit} nested passes; dropping {pending} queued");
                return Err(HookError::TooManyPasses { limit });
            }
            self.pending.set(pending - 1);
            nested += 1;
        }
    }

    fn run_pass(self: &Rc<Self>) -> Result<(), HookError> {
        let pass = self.passes.get() + 1;
        self.passes.set(pass);
        self.store.borrow_mut().reset_cursor();

        // Cloned out so the render function may replace itself mid-pass.
        let render = self.render_fn.borrow().clone();
        let started = Instant::now();
        log::debug!("render pass {pass} begin");

        if let Some(render) = render {
            let hooks = Hooks { root: self, pass };
            render(&hooks).map_err(|source| HookError::Render { pass, source })?;
        }

        let info = {
            let store = self.store.borrow();
            PassInfo {
                pass,
                hooks_called: store.cursor(),
                slots: store.len(),
                keyed_slots: store.keyed_len(),
                duration: started.elapsed(),
            }
        };
        log::debug!(
            "render pass {pass} end: {} hook calls, {} slots",
            info.hooks_called,
            info.slots
        );

        let observers: Vec<PassObserver> = self.observers.borrow().iter().flatten().cloned().collect();
        for observer in observers {
            observer(&info);
        }
        Ok(())
    }

    /// Writes `update` into `addr`. Returns false when the slot is gone or
    /// holds another type, in which case nothing is written.
    pub(crate) fn write<T: Clone + 'static>(&self, addr: &SlotAddr, update: Update<T>) -> bool {
        let next = {
            let store = self.store.borrow();
            let Some(current) = store.slot(addr).and_then(|slot| slot.get::<T>()) else {
                log::warn!(
                    "updater for {:?} is stale (slot missing or no longer holds {}); value dropped",
                    addr,
                    std::any::type_name::<T>()
                );
                return false;
            };
            match update {
                Update::Value(v) => v,
                Update::With(f) => {
                    let previous = current.clone();
                    // The transform runs with no borrow held.
                    drop(store);
                    f(&previous)
                }
            }
        };

        let mut store = self.store.borrow_mut();
        match store.slot_mut(addr).and_then(|slot| slot.get_mut::<T>()) {
            Some(value) => {
                *value = next;
                true
            }
            None => {
                log::warn!("slot {:?} changed while its update was computed; value dropped", addr);
                false
            }
        }
    }
}

/// Hook entry points for the pass in progress.
pub struct Hooks<'a> {
    root: &'a Rc<RootInner>,
    pass: u64,
}

impl Hooks<'_> {
    /// Positional state: the Nth call of every pass reads and writes slot N.
    ///
    /// `initial` only matters the first time slot N is reached; afterwards the
    /// slot's latest value wins. Calls must happen in the same order on every
    /// pass; this is not checked.
    pub fn use_state<T: Clone + 'static>(&self, initial: T) -> (T, Updater<T>) {
        self.use_state_with(|| initial)
    }

    /// Like `use_state`, but only builds the initial value when the slot is
    /// created. `init` must not call back into these hooks.
    pub fn use_state_with<T: Clone + 'static>(&self, init: impl FnOnce() -> T) -> (T, Updater<T>) {
        let (index, value) = self.root.store.borrow_mut().claim(init);
        (value, Updater::new(Rc::downgrade(self.root), SlotAddr::Index(index)))
    }

    /// Key-addressed state. Stable across conditional branches and does not
    /// consume a positional slot.
    pub fn use_state_with_key<T: Clone + 'static>(
        &self,
        key: impl Into<String>,
        initial: T,
    ) -> (T, Updater<T>) {
        let key = key.into();
        let value = self.root.store.borrow_mut().claim_keyed(&key, || initial);
        (value, Updater::new(Rc::downgrade(self.root), SlotAddr::Key(key)))
    }

    /// Index the next `use_state` call will occupy.
    pub fn cursor(&self) -> usize {
        self.root.store.borrow().cursor()
    }

    pub fn pass(&self) -> u64 {
        self.pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_passes_saturate() {
        let root = Root::new();
        root.inner.rendering.set(true);
        root.inner.pending.set(u32::MAX);

        assert!(root.render().is_ok());
        assert_eq!(root.inner.pending.get(), u32::MAX);
        assert_eq!(root.pass_count(), 0);
    }
}
