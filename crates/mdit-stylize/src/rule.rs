//! Stylize rules: a matcher paired with a replacer.

use std::fmt;
use std::sync::Arc;

use mdit_renderer::{Attrs, InlineNode, RenderEnv};
use regex::Regex;

/// Replacer callback.
///
/// Receives the matched node and the render environment. Returns the
/// replacement node, or `None` to leave the node unchanged. The replacement
/// fully replaces tag, attributes and content, so a replacer that wants to
/// keep existing attributes must copy them itself.
pub type Replacer = dyn Fn(&InlineNode, &RenderEnv) -> Option<InlineNode> + Send + Sync;

/// Decides whether a rule applies to a node's text.
#[derive(Clone, Debug)]
pub enum Matcher {
    /// Whole-content string equality. `"MUSTS"` does not match `"MUST"`.
    Exact(String),
    /// Regular expression tested against the whole content.
    Pattern(Regex),
}

impl Matcher {
    /// Check whether `content` matches.
    #[must_use]
    pub fn matches(&self, content: &str) -> bool {
        match self {
            Self::Exact(text) => text == content,
            Self::Pattern(regex) => regex.is_match(content),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => f.write_str(text),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<&str> for Matcher {
    fn from(text: &str) -> Self {
        Self::Exact(text.to_owned())
    }
}

impl From<String> for Matcher {
    fn from(text: String) -> Self {
        Self::Exact(text)
    }
}

impl From<Regex> for Matcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// A matcher paired with a replacer.
///
/// Rules are immutable once built and cheap to clone, so the same rule can
/// be part of a static list and of per-call override lists.
#[derive(Clone)]
pub struct StylizeRule {
    matcher: Matcher,
    replacer: Arc<Replacer>,
}

impl StylizeRule {
    /// Create a rule from a matcher and a replacer callback.
    pub fn new<F>(matcher: impl Into<Matcher>, replacer: F) -> Self
    where
        F: Fn(&InlineNode, &RenderEnv) -> Option<InlineNode> + Send + Sync + 'static,
    {
        Self {
            matcher: matcher.into(),
            replacer: Arc::new(replacer),
        }
    }

    /// Create a rule applying a fixed [`Replacement`].
    #[must_use]
    pub fn declarative(matcher: impl Into<Matcher>, replacement: Replacement) -> Self {
        Self::new(matcher, move |node, _env| replacement.apply(node))
    }

    /// The rule's matcher.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Check whether the rule applies to `content`.
    #[must_use]
    pub fn matches(&self, content: &str) -> bool {
        self.matcher.matches(content)
    }

    /// Invoke the replacer.
    #[must_use]
    pub fn replace(&self, node: &InlineNode, env: &RenderEnv) -> Option<InlineNode> {
        (self.replacer)(node, env)
    }
}

impl fmt::Debug for StylizeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylizeRule")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Fixed replacement applied by a declarative rule.
///
/// Attributes are merged over the node's existing attributes. `content` may
/// reference the original text as `{content}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Replacement {
    /// Tags the rule applies to. Empty means every eligible tag.
    pub tags: Vec<String>,
    /// New tag name.
    pub tag: Option<String>,
    /// Attributes to set.
    pub attrs: Attrs,
    /// New content.
    pub content: Option<String>,
}

impl Replacement {
    /// Apply to a node. Returns `None` if the node's tag is not listed.
    #[must_use]
    pub fn apply(&self, node: &InlineNode) -> Option<InlineNode> {
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| *tag == node.tag) {
            return None;
        }

        let mut result = node.clone();
        if let Some(tag) = &self.tag {
            result.tag.clone_from(tag);
        }
        for (key, value) in &self.attrs {
            result.attrs.insert(key.clone(), value.clone());
        }
        if let Some(content) = &self.content {
            result.content = content.replace("{content}", &node.content);
        }
        Some(result)
    }
}
