//! Inline node descriptor and processor trait.
//!
//! When an `em` or `strong` element contains nothing but text, the renderer
//! builds an [`InlineNode`] for it and offers it to the registered
//! [`InlineProcessor`]s before closing the element. A processor may return
//! a replacement node, which is serialized in place of the default markup.
//!
//! Elements with nested markup (links, code spans, other emphasis) are never
//! offered, and code spans are never treated as emphasis.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::env::RenderEnv;
use crate::state::escape_html;

/// Element attributes in insertion order.
pub type Attrs = IndexMap<String, String>;

/// Tag, attributes and text content of an inline element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineNode {
    /// Element name (e.g., `em`, `strong`).
    pub tag: String,
    /// Attributes rendered on the opening tag.
    pub attrs: Attrs,
    /// Unescaped text content.
    pub content: String,
}

impl InlineNode {
    /// Create a node without attributes.
    #[must_use]
    pub fn new(tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::new(),
            content: content.into(),
        }
    }

    /// Set an attribute, keeping the position of an existing key.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Replace the tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Replace the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Serialize as `<tag attrs>content</tag>`, escaping values and content.
    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attrs {
            write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
        }
        write!(out, ">{}</{}>", escape_html(&self.content), self.tag).unwrap();
    }
}

/// Trait for rewriting inline nodes.
///
/// Processors are consulted in registration order; the first one returning
/// `Some` wins and the rest are skipped.
pub trait InlineProcessor {
    /// Return a replacement for `node`, or `None` to leave it unchanged.
    fn process(&self, node: &InlineNode, env: &RenderEnv) -> Option<InlineNode>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_html_plain() {
        let mut out = String::new();
        InlineNode::new("em", "word").write_html(&mut out);
        assert_eq!(out, "<em>word</em>");
    }

    #[test]
    fn test_write_html_attrs_in_insertion_order() {
        let node = InlineNode::new("strong", "MUST")
            .with_attr("title", "must")
            .with_attr("class", "badge tip");
        let mut out = String::new();
        node.write_html(&mut out);
        assert_eq!(
            out,
            r#"<strong title="must" class="badge tip">MUST</strong>"#
        );
    }

    #[test]
    fn test_with_attr_overwrites_in_place() {
        let node = InlineNode::new("em", "x")
            .with_attr("class", "a")
            .with_attr("id", "y")
            .with_attr("class", "b");
        let keys: Vec<&str> = node.attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, ["class", "id"]);
        assert_eq!(node.attrs["class"], "b");
    }

    #[test]
    fn test_write_html_escapes() {
        let node = InlineNode::new("em", "a < b").with_attr("title", r#"say "hi""#);
        let mut out = String::new();
        node.write_html(&mut out);
        assert_eq!(out, r#"<em title="say &quot;hi&quot;">a &lt; b</em>"#);
    }

    #[test]
    fn test_with_tag_and_content() {
        let node = InlineNode::new("em", "MAY")
            .with_tag("span")
            .with_content("MAY:)");
        assert_eq!(node.tag, "span");
        assert_eq!(node.content, "MAY:)");
    }
}
