//! Rewrite rules: one literal pattern-to-replacement step

use super::source::NodeKind;
use serde::{Deserialize, Serialize};

/// Which nodes of the declaration tree a rule may rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Import,
    ClassHeader,
    Signature,
    ApiCallReturn,
    Text,
    Any,
}

impl Target {
    pub fn accepts(&self, kind: NodeKind) -> bool {
        match self {
            Target::Any => true,
            Target::Import => kind == NodeKind::Import,
            Target::ClassHeader => kind == NodeKind::ClassHeader,
            Target::Signature => kind == NodeKind::Signature,
            Target::ApiCallReturn => kind == NodeKind::ApiCallReturn,
            Target::Text => kind == NodeKind::Text,
        }
    }
}

/// What to do when a rule finds nothing to rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Zero matches aborts generation
    #[default]
    Required,
    /// Zero matches is skipped
    Optional,
}

/// Where in a node the pattern may match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Every occurrence in the node
    #[default]
    Anywhere,
    /// Only directly after the node's leading indentation, at most once
    Leading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
    pub target: Target,
    #[serde(default)]
    pub policy: MatchPolicy,
    #[serde(default)]
    pub anchor: Anchor,
}

impl RewriteRule {
    pub fn required(
        target: Target,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            target,
            policy: MatchPolicy::Required,
            anchor: Anchor::Anywhere,
        }
    }

    pub fn optional(
        target: Target,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            policy: MatchPolicy::Optional,
            ..Self::required(target, pattern, replacement)
        }
    }

    /// Restrict the rule to the start of a node, e.g. a declaration keyword
    pub fn leading(mut self) -> Self {
        self.anchor = Anchor::Leading;
        self
    }

    /// Rewrite every non-overlapping occurrence in `text`, returning the match count
    pub fn rewrite(&self, text: &mut String) -> usize {
        if self.pattern.is_empty() {
            return 0;
        }
        if self.anchor == Anchor::Leading {
            let start = text.len() - text.trim_start().len();
            if !text[start..].starts_with(self.pattern.as_str()) {
                return 0;
            }
            text.replace_range(start..start + self.pattern.len(), &self.replacement);
            return 1;
        }
        let matches = text.matches(self.pattern.as_str()).count();
        if matches > 0 {
            *text = text.replace(self.pattern.as_str(), &self.replacement);
        }
        matches
    }
}
