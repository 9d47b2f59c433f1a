//! The stylize inline processor.

use mdit_renderer::{InlineNode, InlineProcessor, RenderEnv};

use crate::ENV_KEY;
use crate::rule::StylizeRule;

/// Tags eligible for stylizing.
const ELIGIBLE_TAGS: [&str; 2] = ["em", "strong"];

/// Callback extracting per-call rules from the render environment.
pub type LocalConfigGetter = dyn Fn(&RenderEnv) -> Option<&[StylizeRule]> + Send + Sync;

/// Inline processor rewriting `em`/`strong` nodes that match configured rules.
pub struct Stylize {
    config: Vec<StylizeRule>,
    local_config_getter: Box<LocalConfigGetter>,
}

impl Stylize {
    /// Create a processor with the static rule list.
    ///
    /// Per-call rules are read from [`ENV_KEY`] in the render environment.
    #[must_use]
    pub fn new(config: Vec<StylizeRule>) -> Self {
        Self {
            config,
            local_config_getter: Box::new(env_rules),
        }
    }

    /// Replace how per-call rules are read from the render environment.
    #[must_use]
    pub fn with_local_config_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&RenderEnv) -> Option<&[StylizeRule]> + Send + Sync + 'static,
    {
        self.local_config_getter = Box::new(getter);
        self
    }

    /// The static rule list.
    #[must_use]
    pub fn rules(&self) -> &[StylizeRule] {
        &self.config
    }

    /// Find the effective rule for `content` in this render call.
    ///
    /// Per-call rules are searched first, then the static list; within a
    /// list the first matching rule wins.
    #[must_use]
    pub fn find_rule<'a>(&'a self, content: &str, env: &'a RenderEnv) -> Option<&'a StylizeRule> {
        let local = (self.local_config_getter)(env).unwrap_or_default();
        local
            .iter()
            .chain(&self.config)
            .find(|rule| rule.matches(content))
    }

    /// Rewrite `node` if a rule matches and its replacer accepts it.
    #[must_use]
    pub fn transform(&self, node: &InlineNode, env: &RenderEnv) -> Option<InlineNode> {
        if !ELIGIBLE_TAGS.contains(&node.tag.as_str()) {
            return None;
        }
        let rule = self.find_rule(&node.content, env)?;
        let result = rule.replace(node, env);
        tracing::debug!(
            matcher = %rule.matcher(),
            tag = %node.tag,
            replaced = result.is_some(),
            "Stylize rule matched"
        );
        result
    }
}

impl InlineProcessor for Stylize {
    fn process(&self, node: &InlineNode, env: &RenderEnv) -> Option<InlineNode> {
        self.transform(node, env)
    }
}

/// Read per-call rules stored under [`ENV_KEY`].
fn env_rules(env: &RenderEnv) -> Option<&[StylizeRule]> {
    env.get::<Vec<StylizeRule>>(ENV_KEY).map(Vec::as_slice)
}
