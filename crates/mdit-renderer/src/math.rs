//! Math processor trait.
//!
//! The renderer does not know how to typeset math. When a processor is
//! registered, the parser is configured to recognize `$…$` and `$$…$$`
//! spans and the renderer hands their raw content to the processor,
//! splicing the returned string into the output verbatim.

use crate::env::RenderEnv;
use crate::error::BoxError;

/// Trait for rendering math content.
pub trait MathProcessor {
    /// Render math source to an HTML fragment.
    ///
    /// # Arguments
    ///
    /// * `content` - Raw math source without delimiters
    /// * `display_mode` - `true` for block-level math, `false` for inline
    /// * `env` - Environment of the current render call
    ///
    /// The returned string is inserted without escaping. An error aborts
    /// the render call.
    fn render(
        &self,
        content: &str,
        display_mode: bool,
        env: &RenderEnv,
    ) -> Result<String, BoxError>;

    /// Whether a fenced code block with this info string holds math.
    ///
    /// `info` is the whole trimmed info string, not just its first word.
    /// Claimed fences are rendered in display mode instead of as code.
    /// Default implementation claims no fences.
    fn handles_fence(&self, _info: &str) -> bool {
        false
    }
}
