use async_trait::async_trait;
use velo_rules::{CombinationRule, PricingRule};

use crate::CollaboratorResult;

/// Durable storage for rules, written after the in-memory registry changes.
#[async_trait]
pub trait RuleStore: Send + Sync {
    async fn save_pricing_rule(&self, rule: &PricingRule) -> CollaboratorResult<()>;

    async fn save_combination_rule(&self, rule: &CombinationRule) -> CollaboratorResult<()>;
}
