pub mod condition;
pub mod models;
pub mod registry;
pub mod engine;

pub use condition::{ConditionError, RuleCondition};
pub use models::{CombinationRule, PricingRule, Rule, RuleId};
pub use registry::{RegistryError, RuleBook, RuleRegistry, UpsertOutcome};
pub use engine::RuleEvaluation;
