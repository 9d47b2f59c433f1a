//! Keyword-driven rewriting of emphasis and strong nodes.
//!
//! [`Stylize`] is an [`InlineProcessor`](mdit_renderer::InlineProcessor)
//! holding an ordered list of [`StylizeRule`]s. When an `em` or `strong`
//! element's full text equals a rule's matcher, the rule's replacer may
//! return a new tag, attributes and content for the element.
//!
//! # Per-call overrides
//!
//! A render call may carry extra rules in its [`RenderEnv`] under
//! [`ENV_KEY`] as a `Vec<StylizeRule>`. Those rules are searched first: an
//! override entry fully shadows a static entry with the same matcher for
//! that call only, and override entries for new matchers are added for that
//! call.
//!
//! # Example
//!
//! ```
//! use mdit_renderer::{MarkdownRenderer, RenderEnv};
//! use mdit_stylize::{ENV_KEY, Stylize, StylizeRule};
//!
//! let stylize = Stylize::new(vec![StylizeRule::new("MUST", |node, _env| {
//!     Some(node.clone().with_attr("class", "badge tip"))
//! })]);
//! let renderer = MarkdownRenderer::new().with_inline_processor(stylize);
//!
//! assert_eq!(
//!     renderer.render_markdown("**MUST**").unwrap(),
//!     "<p><strong class=\"badge tip\">MUST</strong></p>\n"
//! );
//!
//! // Leave MUST alone for this call only
//! let env = RenderEnv::new().with(
//!     ENV_KEY,
//!     vec![StylizeRule::new("MUST", |_node, _env| None)],
//! );
//! assert_eq!(
//!     renderer.render_markdown_with_env("**MUST**", &env).unwrap(),
//!     "<p><strong>MUST</strong></p>\n"
//! );
//! ```
//!
//! [`RenderEnv`]: mdit_renderer::RenderEnv

mod rule;
mod stylize;

pub use rule::{Matcher, Replacement, Replacer, StylizeRule};
pub use stylize::{LocalConfigGetter, Stylize};

/// Environment key holding per-call rules (`Vec<StylizeRule>`).
pub const ENV_KEY: &str = "stylize";
