use serde::{Deserialize, Serialize};
use velo_shared::RuleKind;

use crate::condition::RuleCondition;

pub type RuleId = u64;

/// Behaviour shared by every rule kind the registry stores.
pub trait Rule: std::fmt::Debug + Clone + Send + Sync + 'static {
    const KIND: RuleKind;

    fn id(&self) -> RuleId;

    fn condition(&self) -> &RuleCondition;
}

/// Adjusts the base price of every selection its condition matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    pub id: RuleId,
    pub condition: RuleCondition,
    pub price_adjustment: i32,
}

impl PricingRule {
    pub fn new(id: RuleId, condition: RuleCondition, price_adjustment: i32) -> Self {
        Self {
            id,
            condition,
            price_adjustment,
        }
    }
}

impl Rule for PricingRule {
    const KIND: RuleKind = RuleKind::Pricing;

    fn id(&self) -> RuleId {
        self.id
    }

    fn condition(&self) -> &RuleCondition {
        &self.condition
    }
}

/// Allows or denies the selections its condition matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationRule {
    pub id: RuleId,
    pub condition: RuleCondition,
    pub allowed: bool,
}

impl CombinationRule {
    pub fn new(id: RuleId, condition: RuleCondition, allowed: bool) -> Self {
        Self {
            id,
            condition,
            allowed,
        }
    }

    pub fn deny(id: RuleId, condition: RuleCondition) -> Self {
        Self::new(id, condition, false)
    }
}

impl Rule for CombinationRule {
    const KIND: RuleKind = RuleKind::Combination;

    fn id(&self) -> RuleId {
        self.id
    }

    fn condition(&self) -> &RuleCondition {
        &self.condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_rule_wire_shape() {
        let rule: PricingRule = serde_json::from_str(
            r#"{"id": 3, "condition": "frameFinish = Shiny and wheels is set", "priceAdjustment": -10}"#,
        )
        .unwrap();

        assert_eq!(rule.id, 3);
        assert_eq!(rule.price_adjustment, -10);
        assert_eq!(
            serde_json::to_value(&rule).unwrap()["condition"],
            "frameFinish = \"Shiny\" and wheels is set"
        );
    }

    #[test]
    fn test_empty_condition_survives_storage() {
        let rule = PricingRule::new(1, RuleCondition::All(vec![]), 5);

        let json = serde_json::to_string(&rule).unwrap();
        let back: PricingRule = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, 1);
        assert_eq!(back.condition, RuleCondition::Always);
        assert_eq!(back.price_adjustment, 5);

        let deny_nothing = CombinationRule::deny(2, RuleCondition::Any(vec![]));
        let back: CombinationRule = serde_json::from_str(&serde_json::to_string(&deny_nothing).unwrap()).unwrap();
        assert_eq!(back.condition, !RuleCondition::Always);
    }

    #[test]
    fn test_bad_condition_rejected() {
        let result = serde_json::from_str::<CombinationRule>(
            r#"{"id": 1, "condition": "rimColor = Green", "allowed": false}"#,
        );
        assert!(result.is_err());
    }
}
