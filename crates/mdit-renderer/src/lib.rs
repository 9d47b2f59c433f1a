//! Markdown to HTML renderer with pluggable extension hooks.
//!
//! This crate provides a [`MarkdownRenderer`] that turns `pulldown-cmark`
//! events into an HTML fragment. Plugins attach at two seams:
//!
//! - [`InlineProcessor`]: rewrites `em`/`strong` nodes whose content is a
//!   single run of text (see `mdit-stylize`)
//! - [`MathProcessor`]: renders inline math, display math and math fences
//!   (see `mdit-tex`)
//!
//! Each render call receives a [`RenderEnv`], a caller-owned bag of named
//! values that plugins may read to adjust their behavior for that call only.
//!
//! # Example
//!
//! ```
//! use mdit_renderer::{InlineNode, InlineProcessor, MarkdownRenderer, RenderEnv};
//!
//! struct Shout;
//!
//! impl InlineProcessor for Shout {
//!     fn process(&self, node: &InlineNode, _env: &RenderEnv) -> Option<InlineNode> {
//!         (node.content == "hey").then(|| node.clone().with_attr("class", "shout"))
//!     }
//! }
//!
//! let renderer = MarkdownRenderer::new().with_inline_processor(Shout);
//! let html = renderer.render_markdown("**hey**").unwrap();
//! assert_eq!(html, "<p><strong class=\"shout\">hey</strong></p>\n");
//! ```

mod env;
mod error;
mod math;
mod node;
mod renderer;
mod state;
mod util;

pub use env::RenderEnv;
pub use error::{BoxError, RenderError};
pub use math::MathProcessor;
pub use node::{Attrs, InlineNode, InlineProcessor};
pub use renderer::MarkdownRenderer;
pub use state::escape_html;
