use std::sync::Arc;

use tracing::{info, warn};
use velo_catalog::{AttributeSelection, RawSelection};
use velo_core::{CollaboratorResult, Notifier, RuleStore};
use velo_rules::{CombinationRule, PricingRule, RuleId, UpsertOutcome};
use velo_shared::{ConfiguratorEvent, RuleKind, RuleUpsertedEvent, SelectionConfiguredEvent};

use crate::configurator::{ConfigureError, Configurator};
use crate::models::{ConfigurationResult, UpsertReport};

/// Async outer layer: runs the configurator, then talks to collaborators.
///
/// Collaborator failures are logged and reported, never propagated, and never
/// undo the in-memory change that preceded them. Each collaborator gets exactly
/// one attempt.
pub struct ConfiguratorService {
    configurator: Configurator,
    notifier: Arc<dyn Notifier>,
    store: Option<Arc<dyn RuleStore>>,
}

impl ConfiguratorService {
    pub fn new(configurator: Configurator, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            configurator,
            notifier,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn RuleStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    pub async fn upsert_pricing_rule(&self, rule: PricingRule) -> UpsertReport {
        let outcome = self.configurator.registry().upsert_pricing_rule(rule.clone());

        let saved = match &self.store {
            Some(store) => Some(store.save_pricing_rule(&rule).await),
            None => None,
        };

        self.finish_upsert(RuleKind::Pricing, rule.id, outcome, saved).await
    }

    pub async fn upsert_combination_rule(&self, rule: CombinationRule) -> UpsertReport {
        let outcome = self
            .configurator
            .registry()
            .upsert_combination_rule(rule.clone());

        let saved = match &self.store {
            Some(store) => Some(store.save_combination_rule(&rule).await),
            None => None,
        };

        self.finish_upsert(RuleKind::Combination, rule.id, outcome, saved).await
    }

    /// Configure synchronously, then tell observers about the result.
    pub async fn configure(&self, raw: &RawSelection) -> Result<ConfigurationResult, ConfigureError> {
        let selection = AttributeSelection::from_raw(raw)?;
        self.configure_selection(&selection).await
    }

    pub async fn configure_selection(
        &self,
        selection: &AttributeSelection,
    ) -> Result<ConfigurationResult, ConfigureError> {
        let result = self.configurator.configure_selection(selection)?;

        let selection = serde_json::to_value(result.validated).unwrap_or(serde_json::Value::Null);
        let event = SelectionConfiguredEvent::new(selection, result.total, result.blocked_by_combination);
        self.publish(ConfiguratorEvent::SelectionConfigured(event)).await;

        Ok(result)
    }

    async fn finish_upsert(
        &self,
        kind: RuleKind,
        id: RuleId,
        outcome: UpsertOutcome,
        saved: Option<CollaboratorResult<()>>,
    ) -> UpsertReport {
        let persisted = match saved {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                warn!("Failed to persist {} rule {}: {}", kind, id, e);
                false
            }
            None => false,
        };

        let event = RuleUpsertedEvent::new(kind, id, outcome.created);
        info!("{}", event.message());
        let notified = self.publish(ConfiguratorEvent::RuleUpserted(event)).await;

        UpsertReport {
            outcome,
            persisted,
            notified,
        }
    }

    async fn publish(&self, event: ConfiguratorEvent) -> bool {
        match self.notifier.notify(&event).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to notify observers: {}", e);
                false
            }
        }
    }
}
