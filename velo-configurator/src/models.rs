use serde::{Deserialize, Serialize};
use velo_catalog::{AttributeSelection, Clearance};
use velo_rules::{CombinationRule, PricingRule, UpsertOutcome};

/// Everything a caller needs to show or check out a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationResult {
    /// The selection after incompatible choices were cleared
    pub validated: AttributeSelection,
    pub cleared: Vec<Clearance>,
    pub base_total: i32,
    pub adjustment: i32,
    /// `base_total + adjustment`
    pub total: i32,
    pub applicable_pricing_rules: Vec<PricingRule>,
    /// Checkout gating is left to the caller; totals are computed either way
    pub blocked_by_combination: bool,
    pub blocking_rules: Vec<CombinationRule>,
}

/// What happened around one rule upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertReport {
    pub outcome: UpsertOutcome,
    /// A rule store was configured and accepted the rule
    pub persisted: bool,
    pub notified: bool,
}
