pub use crate::config::RootConfig;
pub use crate::error::{BoxError, HookError};
#[cfg(feature = "inspector")]
pub use crate::root::SlotInfo;
pub use crate::root::{Hooks, ObserverId, PassInfo, Root};
pub use crate::state::{Update, Updater};
pub use crate::store::SlotAddr;
