//! Math rendering delegate.
//!
//! [`Tex`] is a [`MathProcessor`] that hands math content to a caller
//! supplied render function and splices the returned string into the output
//! as-is. It does not validate or typeset math itself.
//!
//! | Source | `display_mode` |
//! |--------|----------------|
//! | `$…$` | `false` |
//! | `$$…$$` | `true` |
//! | `` ```math `` fence (with [`Tex::with_math_fence`]) | `true` |
//!
//! # Example
//!
//! ```
//! use mdit_renderer::MarkdownRenderer;
//! use mdit_tex::Tex;
//!
//! let tex = Tex::new(|content, display_mode, _env| {
//!     let tag = if display_mode { "div" } else { "span" };
//!     format!("<{tag} class=\"math\">{content}</{tag}>")
//! });
//! let renderer = MarkdownRenderer::new().with_math_processor(tex);
//!
//! assert_eq!(
//!     renderer.render_markdown("Euler: $e^{i\\pi}+1=0$").unwrap(),
//!     "<p>Euler: <span class=\"math\">e^{i\\pi}+1=0</span></p>\n"
//! );
//! ```

use std::convert::Infallible;

use mdit_renderer::{BoxError, MathProcessor, RenderEnv};

/// Fence language treated as math.
pub const MATH_FENCE_LANGUAGE: &str = "math";

/// Render callback: `(content, display_mode, env) -> html`.
pub type TexRenderFn = dyn Fn(&str, bool, &RenderEnv) -> Result<String, BoxError> + Send + Sync;

/// Math processor delegating to a render callback.
pub struct Tex {
    render: Box<TexRenderFn>,
    math_fence: bool,
}

impl Tex {
    /// Create a delegate from an infallible render function.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&str, bool, &RenderEnv) -> String + Send + Sync + 'static,
    {
        Self::try_new(
            move |content: &str, display_mode: bool, env: &RenderEnv| {
                Ok::<_, Infallible>(render(content, display_mode, env))
            },
        )
    }

    /// Create a delegate from a fallible render function.
    ///
    /// An error from the function aborts the render call with
    /// [`RenderError::Math`](mdit_renderer::RenderError::Math).
    pub fn try_new<F, E>(render: F) -> Self
    where
        F: Fn(&str, bool, &RenderEnv) -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            render: Box::new(
                move |content: &str, display_mode: bool, env: &RenderEnv| {
                    render(content, display_mode, env).map_err(Into::into)
                },
            ),
            math_fence: false,
        }
    }

    /// Render `math` fences as display math.
    ///
    /// Disabled by default, in which case `math` fences stay code blocks.
    #[must_use]
    pub fn with_math_fence(mut self, enabled: bool) -> Self {
        self.math_fence = enabled;
        self
    }

    /// Whether `math` fences are rendered as display math.
    #[must_use]
    pub fn math_fence(&self) -> bool {
        self.math_fence
    }
}

impl MathProcessor for Tex {
    fn render(
        &self,
        content: &str,
        display_mode: bool,
        env: &RenderEnv,
    ) -> Result<String, BoxError> {
        tracing::trace!(display_mode, len = content.len(), "Rendering tex");
        (self.render)(content, display_mode, env)
    }

    fn handles_fence(&self, info: &str) -> bool {
        self.math_fence && info == MATH_FENCE_LANGUAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdit_renderer::{MarkdownRenderer, RenderError};
    use pretty_assertions::assert_eq;

    static_assertions::assert_impl_all!(Tex: Send, Sync);

    fn tagged(content: &str, display_mode: bool, _env: &RenderEnv) -> String {
        if display_mode {
            format!("<div class=\"tex\">{content}</div>")
        } else {
            format!("<span class=\"tex\">{content}</span>")
        }
    }

    fn render(tex: Tex, markdown: &str) -> String {
        MarkdownRenderer::new()
            .with_math_processor(tex)
            .render_markdown(markdown)
            .unwrap()
    }

    #[derive(Debug, thiserror::Error)]
    #[error("undefined control sequence: {0}")]
    struct ParseError(String);

    #[test]
    fn test_inline_math() {
        assert_eq!(
            render(Tex::new(tagged), "Area $\\pi r^2$ here"),
            "<p>Area <span class=\"tex\">\\pi r^2</span> here</p>\n"
        );
    }

    #[test]
    fn test_display_math_inside_paragraph() {
        assert_eq!(
            render(Tex::new(tagged), "Sum $$\\sum x$$ done"),
            "<p>Sum <div class=\"tex\">\\sum x</div> done</p>\n"
        );
    }

    #[test]
    fn test_display_math_block() {
        assert_eq!(
            render(Tex::new(tagged), "Intro\n\n$$a + b$$\n\nOutro"),
            "<p>Intro</p>\n<div class=\"tex\">a + b</div>\n<p>Outro</p>\n"
        );
    }

    #[test]
    fn test_output_not_escaped() {
        let tex = Tex::new(|_content, _display_mode, _env| "<b>&</b>".to_owned());
        assert_eq!(render(tex, "x $y$"), "<p>x <b>&</b></p>\n");
    }

    #[test]
    fn test_math_fence_enabled() {
        let tex = Tex::new(tagged).with_math_fence(true);
        assert!(tex.math_fence());
        assert_eq!(
            render(tex, "```math\nE = mc^2\n```"),
            "<div class=\"tex\">E = mc^2\n</div>\n"
        );
    }

    #[test]
    fn test_math_fence_disabled_by_default() {
        let tex = Tex::new(tagged);
        assert!(!tex.math_fence());
        assert_eq!(
            render(tex, "```math\nE = mc^2\n```"),
            "<pre><code class=\"language-math\">E = mc^2\n</code></pre>\n"
        );
    }

    #[test]
    fn test_other_fences_untouched() {
        let tex = Tex::new(tagged).with_math_fence(true);
        assert!(!tex.handles_fence("latex"));
        assert_eq!(
            render(tex, "```tex\n\\alpha\n```"),
            "<pre><code class=\"language-tex\">\\alpha\n</code></pre>\n"
        );
    }

    #[test]
    fn test_math_fence_requires_bare_info() {
        let tex = Tex::new(tagged).with_math_fence(true);
        assert!(!tex.handles_fence("math title=x"));
        assert_eq!(
            render(tex, "```math title=x\nE = mc^2\n```"),
            "<pre><code class=\"language-math\">E = mc^2\n</code></pre>\n"
        );
    }

    #[test]
    fn test_math_fence_info_trimmed() {
        let tex = Tex::new(tagged).with_math_fence(true);
        assert_eq!(
            render(tex, "```  math  \nx\n```"),
            "<div class=\"tex\">x\n</div>\n"
        );
    }

    #[test]
    fn test_env_passed_to_render() {
        let tex = Tex::new(|content, _display_mode, env| {
            let macro_prefix = env.get::<String>("prefix").map_or("", String::as_str);
            format!("[{macro_prefix}{content}]")
        });
        let renderer = MarkdownRenderer::new().with_math_processor(tex);
        let env = RenderEnv::new().with("prefix", "\\def ".to_owned());
        assert_eq!(
            renderer.render_markdown_with_env("$x$", &env).unwrap(),
            "<p>[\\def x]</p>\n"
        );
        assert_eq!(renderer.render_markdown("$x$").unwrap(), "<p>[x]</p>\n");
    }

    #[test]
    fn test_render_error_propagates() {
        let tex = Tex::try_new(|content: &str, _display_mode, _env: &RenderEnv| {
            if content.contains("\\bad") {
                Err(ParseError("\\bad".to_owned()))
            } else {
                Ok(content.to_owned())
            }
        });
        let renderer = MarkdownRenderer::new().with_math_processor(tex);

        assert_eq!(renderer.render_markdown("$ok$").unwrap(), "<p>ok</p>\n");

        let err = renderer.render_markdown("$$\\bad$$").unwrap_err();
        let RenderError::Math {
            display_mode,
            source,
        } = err;
        assert!(display_mode);
        assert_eq!(
            source.downcast_ref::<ParseError>().map(|e| e.0.as_str()),
            Some("\\bad")
        );
    }

    #[test]
    fn test_fence_error_propagates() {
        let tex = Tex::try_new(|_content: &str, _display_mode, _env: &RenderEnv| {
            Err::<String, _>("fence failed")
        })
        .with_math_fence(true);
        let err = MarkdownRenderer::new()
            .with_math_processor(tex)
            .render_markdown("```math\nx\n```")
            .unwrap_err();
        assert!(err.to_string().contains("fence failed"));
    }

    #[test]
    fn test_calls_are_independent() {
        let renderer = MarkdownRenderer::new().with_math_processor(Tex::new(tagged));
        let first = renderer.render_markdown("$a$").unwrap();
        let second = renderer.render_markdown("$a$").unwrap();
        assert_eq!(first, second);
    }
}
