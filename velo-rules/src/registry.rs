use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use velo_catalog::AttributeSelection;
use velo_shared::RuleKind;

use crate::models::{CombinationRule, PricingRule, Rule, RuleId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{kind} rule not found: {id}")]
    NotFound { kind: RuleKind, id: RuleId },
}

/// Result of an insert-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertOutcome {
    pub created: bool,
}

/// Rules of one kind, unique by id, kept in registration order.
///
/// Writers are serialized by the lock. Readers always get clones.
#[derive(Debug)]
pub struct RuleBook<R: Rule> {
    rules: RwLock<Vec<R>>,
}

impl<R: Rule> RuleBook<R> {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Replace the rule with the same id in place, or append it.
    pub fn upsert(&self, rule: R) -> UpsertOutcome {
        let id = rule.id();
        let mut rules = self.rules.write();

        match rules.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => {
                *existing = rule;
                debug!("Updated {} rule {}", R::KIND, id);
                UpsertOutcome { created: false }
            }
            None => {
                rules.push(rule);
                info!("Registered {} rule {} ({} total)", R::KIND, id, rules.len());
                UpsertOutcome { created: true }
            }
        }
    }

    /// Replace an existing rule; never inserts.
    pub fn update(&self, rule: R) -> Result<(), RegistryError> {
        let id = rule.id();
        let mut rules = self.rules.write();

        let existing = rules
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or(RegistryError::NotFound { kind: R::KIND, id })?;
        *existing = rule;
        debug!("Updated {} rule {}", R::KIND, id);
        Ok(())
    }

    pub fn get(&self, id: RuleId) -> Option<R> {
        self.rules.read().iter().find(|rule| rule.id() == id).cloned()
    }

    /// Lookup that treats an absent id as an error.
    pub fn require(&self, id: RuleId) -> Result<R, RegistryError> {
        self.get(id).ok_or(RegistryError::NotFound { kind: R::KIND, id })
    }

    pub fn list(&self) -> Vec<R> {
        self.rules.read().clone()
    }

    /// Rules whose condition holds for the selection, in registration order.
    pub fn matching(&self, selection: &AttributeSelection) -> Vec<R> {
        self.rules
            .read()
            .iter()
            .filter(|rule| rule.condition().matches(selection))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl<R: Rule> Default for RuleBook<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the pricing and combination rules of one configurator.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    pricing: RuleBook<PricingRule>,
    combination: RuleBook<CombinationRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pricing(&self) -> &RuleBook<PricingRule> {
        &self.pricing
    }

    pub fn combination(&self) -> &RuleBook<CombinationRule> {
        &self.combination
    }

    pub fn upsert_pricing_rule(&self, rule: PricingRule) -> UpsertOutcome {
        self.pricing.upsert(rule)
    }

    pub fn upsert_combination_rule(&self, rule: CombinationRule) -> UpsertOutcome {
        self.combination.upsert(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::RuleCondition;
    use std::sync::Arc;
    use velo_catalog::{FrameFinish, FrameType, RimColor};

    #[test]
    fn test_upsert_inserts_then_updates() {
        let registry = RuleRegistry::new();

        let outcome = registry.upsert_pricing_rule(PricingRule::new(1, RuleCondition::Always, 10));
        assert_eq!(outcome, UpsertOutcome { created: true });
        assert_eq!(registry.pricing().list().len(), 1);

        let changed = PricingRule::new(1, RuleCondition::is(FrameType::Diamond), -15);
        let outcome = registry.upsert_pricing_rule(changed.clone());
        assert_eq!(outcome, UpsertOutcome { created: false });
        assert_eq!(registry.pricing().list().len(), 1);
        assert_eq!(registry.pricing().get(1), Some(changed));
    }

    #[test]
    fn test_update_keeps_registration_order() {
        let book = RuleBook::new();
        for id in [5, 2, 9] {
            book.upsert(CombinationRule::deny(id, RuleCondition::Always));
        }

        book.upsert(CombinationRule::new(2, RuleCondition::Always, true));
        book.upsert(CombinationRule::deny(4, RuleCondition::Always));

        let ids: Vec<RuleId> = book.list().iter().map(|rule| rule.id).collect();
        assert_eq!(ids, vec![5, 2, 9, 4]);
        assert!(book.require(2).unwrap().allowed);
    }

    #[test]
    fn test_lookup_only_paths_report_not_found() {
        let registry = RuleRegistry::new();

        assert_eq!(registry.combination().get(42), None);
        assert_eq!(
            registry.combination().require(42),
            Err(RegistryError::NotFound { kind: RuleKind::Combination, id: 42 })
        );
        assert_eq!(
            registry.pricing().update(PricingRule::new(42, RuleCondition::Always, 1)),
            Err(RegistryError::NotFound { kind: RuleKind::Pricing, id: 42 })
        );
        assert!(registry.pricing().is_empty());
    }

    #[test]
    fn test_kinds_are_independent() {
        let registry = RuleRegistry::new();
        registry.upsert_pricing_rule(PricingRule::new(1, RuleCondition::Always, 5));
        registry.upsert_combination_rule(CombinationRule::deny(1, RuleCondition::Always));

        assert_eq!(registry.pricing().len(), 1);
        assert_eq!(registry.combination().len(), 1);
    }

    #[test]
    fn test_matching_filters_by_condition() {
        let book = RuleBook::new();
        book.upsert(PricingRule::new(1, RuleCondition::is(FrameFinish::Matte), 5));
        book.upsert(PricingRule::new(2, RuleCondition::is(RimColor::Red), 7));

        let selection = AttributeSelection::new().with(RimColor::Red);
        let matched: Vec<RuleId> = book.matching(&selection).iter().map(|rule| rule.id).collect();
        assert_eq!(matched, vec![2]);
    }

    #[test]
    fn test_concurrent_upserts_keep_ids_unique() {
        let registry = Arc::new(RuleRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for id in 0..50u64 {
                        registry.upsert_pricing_rule(PricingRule::new(id, RuleCondition::Always, worker));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rules = registry.pricing().list();
        assert_eq!(rules.len(), 50);
        let ids: Vec<RuleId> = rules.iter().map(|rule| rule.id).collect();
        assert_eq!(ids, (0..50).collect::<Vec<_>>());
    }
}
