/// Per-root settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootConfig {
    /// How many passes queued by updates made during a pass may run before
    /// the trampoline gives up with `HookError::TooManyPasses`.
    pub max_nested_passes: u32,
    /// Slot vector preallocation.
    pub initial_capacity: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_nested_passes: 50,
            initial_capacity: 0,
        }
    }
}

impl RootConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_nested_passes(mut self, limit: u32) -> Self {
        self.max_nested_passes = limit;
        self
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
