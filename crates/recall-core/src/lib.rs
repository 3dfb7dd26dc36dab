//! # Roots, passes, and state slots
//!
//! Recall keeps state for a render function that is otherwise stateless.
//! There are three pieces:
//!
//! - `Root` — owns the slots and the render function, and re-runs it.
//! - `Hooks::use_state` — reads (or creates) the slot for this call.
//! - `Updater<T>` — writes a slot and triggers the next pass.
//!
//! ## Positional state
//!
//! Slots are addressed by call order: the Nth `use_state` of every pass is
//! bound to slot N. The initial value only counts the first time a slot is
//! reached.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use recall_core::*;
//!
//! let seen = Rc::new(Cell::new(0));
//! let setter = Rc::new(std::cell::RefCell::new(None));
//!
//! let root = Root::new().with_render({
//!     let seen = seen.clone();
//!     let setter = setter.clone();
//!     move |hooks| {
//!         let (count, set_count) = hooks.use_state(0);
//!         seen.set(count);
//!         *setter.borrow_mut() = Some(set_count);
//!         Ok(())
//!     }
//! });
//!
//! root.render().unwrap();
//! assert_eq!(seen.get(), 0);
//!
//! let set_count = setter.borrow().clone().unwrap();
//! set_count.set(5).unwrap();
//! assert_eq!(seen.get(), 5);
//!
//! set_count.set_with(|prev| prev + 1).unwrap();
//! assert_eq!(seen.get(), 6);
//! ```
//!
//! Calls must happen in the same order on every pass. A conditional
//! `use_state` shifts every later slot; nothing detects this beyond a warning
//! when a slot turns out to hold a different type.
//!
//! ## Keyed state
//!
//! `use_state_with_key` addresses a slot by name instead and leaves the cursor
//! alone, so it is safe inside branches.
//!
//! ## Updates during a pass
//!
//! An updater called while its root is rendering writes immediately and queues
//! one more pass, which runs after the current one returns. Passes never
//! overlap; `RootConfig::max_nested_passes` bounds the queue.

pub mod config;
pub mod error;
pub mod prelude;
pub mod root;
pub mod state;
pub mod store;

pub use prelude::*;
