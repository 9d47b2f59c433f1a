//! Render errors.

/// Boxed error returned by extension callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error that aborts a render call.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The registered math processor failed.
    #[error("math rendering failed (display_mode = {display_mode}): {source}")]
    Math {
        /// Whether the failing content was display math.
        display_mode: bool,
        /// Error returned by the math processor.
        #[source]
        source: BoxError,
    },
}
