use serde::{Deserialize, Serialize};
use velo_catalog::{AttributeSelection, PricingError};

use crate::models::{CombinationRule, PricingRule};
use crate::registry::RuleRegistry;

/// What the registered rules say about one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub applicable_pricing_rules: Vec<PricingRule>,
    pub adjustment: i32,
    pub blocking_rules: Vec<CombinationRule>,
}

impl RuleEvaluation {
    /// A single matching deny blocks, whatever else allows.
    pub fn is_blocked(&self) -> bool {
        !self.blocking_rules.is_empty()
    }
}

impl RuleRegistry {
    pub fn applicable_pricing_rules(&self, selection: &AttributeSelection) -> Vec<PricingRule> {
        self.pricing().matching(selection)
    }

    /// Matching combination rules that deny the selection.
    pub fn blocking_rules(&self, selection: &AttributeSelection) -> Vec<CombinationRule> {
        self.combination()
            .matching(selection)
            .into_iter()
            .filter(|rule| !rule.allowed)
            .collect()
    }

    pub fn evaluate(&self, selection: &AttributeSelection) -> Result<RuleEvaluation, PricingError> {
        let applicable_pricing_rules = self.applicable_pricing_rules(selection);
        let adjustment = applicable_pricing_rules
            .iter()
            .try_fold(0i32, |total, rule| total.checked_add(rule.price_adjustment))
            .ok_or(PricingError::Overflow)?;

        Ok(RuleEvaluation {
            applicable_pricing_rules,
            adjustment,
            blocking_rules: self.blocking_rules(selection),
        })
    }
}
