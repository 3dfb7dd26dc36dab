use thiserror::Error;

/// Error type render functions hand back to the trampoline.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum HookError {
    /// The render function failed. `source` is exactly what it returned.
    #[error("render pass {pass} failed")]
    Render {
        pass: u64,
        #[source]
        source: BoxError,
    },

    #[error("render loop exceeded {limit} nested passes")]
    TooManyPasses { limit: u32 },
}

impl HookError {
    /// Takes back the render function's own error, if that is what failed.
    pub fn into_render_error(self) -> Option<BoxError> {
        match self {
            HookError::Render { source, .. } => Some(source),
            HookError::TooManyPasses { .. } => None,
        }
    }
}
