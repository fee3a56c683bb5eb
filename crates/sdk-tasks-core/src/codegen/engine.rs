//! Applies a profile's rules, in order, to the canonical declaration tree

use super::profile::VariantProfile;
use super::rule::{MatchPolicy, RewriteRule};
use super::source::SourceTree;
use crate::error::{TaskError, TaskResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite `tree` in place, one rule at a time
    ///
    /// The output of rule *i* is the input of rule *i + 1*. Each rule only sees
    /// nodes its target accepts. A `Required` rule with no match fails with
    /// [`TaskError::RuleNoMatch`].
    pub fn apply_rules(
        &self,
        profile_name: &str,
        tree: &mut SourceTree,
        rules: &[RewriteRule],
    ) -> TaskResult<()> {
        for (index, rule) in rules.iter().enumerate() {
            let ordinal = index + 1;
            let matches: usize = tree
                .nodes_mut()
                .iter_mut()
                .filter(|node| rule.target.accepts(node.kind))
                .map(|node| rule.rewrite(&mut node.text))
                .sum();

            if matches > 0 {
                tracing::trace!(profile = profile_name, ordinal, matches, "rule applied");
                continue;
            }

            match rule.policy {
                MatchPolicy::Required => {
                    return Err(TaskError::RuleNoMatch {
                        profile: profile_name.to_string(),
                        ordinal,
                        pattern: rule.pattern.clone(),
                    })
                }
                MatchPolicy::Optional => {
                    tracing::debug!(
                        profile = profile_name,
                        ordinal,
                        pattern = %rule.pattern,
                        "optional rule matched nothing"
                    );
                }
            }
        }
        Ok(())
    }

    /// Parse `text`, rewrite it with `rules` and render it back
    pub fn apply(&self, profile_name: &str, text: &str, rules: &[RewriteRule]) -> TaskResult<String> {
        let mut tree = SourceTree::parse(text);
        self.apply_rules(profile_name, &mut tree, rules)?;
        Ok(tree.render())
    }

    /// Produce the full generated artifact for a profile
    pub fn generate(&self, profile: &VariantProfile, canonical: &str) -> TaskResult<String> {
        let body = self.apply(profile.name(), canonical, &profile.rules)?;
        let mut output =
            String::with_capacity(profile.header_banner.len() + profile.prelude.len() + body.len());
        output.push_str(&profile.header_banner);
        output.push_str(&profile.prelude);
        output.push_str(&body);
        Ok(output)
    }
}
