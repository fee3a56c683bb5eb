//! Client variant generation
//!
//! The canonical client is parsed into a declaration tree, each variant
//! profile rewrites a copy of that tree rule by rule, and the results are
//! written next to the canonical source before the formatter runs.

pub mod engine;
pub mod orchestrator;
pub mod profile;
pub mod rule;
pub mod source;

pub use engine::RuleEngine;
pub use orchestrator::VariantOrchestrator;
pub use profile::{async_profile, banner, legacy_profile, ClientShape, VariantKind, VariantProfile};
pub use rule::{Anchor, MatchPolicy, RewriteRule, Target};
pub use source::{CanonicalSource, NodeKind, SourceTree};
