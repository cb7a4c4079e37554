use std::sync::Arc;

use velo_catalog::{AttributeSelection, Catalog, PricingError, RawSelection, SelectionError};
use velo_rules::RuleRegistry;

use crate::models::ConfigurationResult;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigureError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Validate, gate and price one raw selection.
pub fn configure(
    raw: &RawSelection,
    catalog: &Catalog,
    registry: &RuleRegistry,
) -> Result<ConfigurationResult, ConfigureError> {
    let selection = AttributeSelection::from_raw(raw)?;
    configure_selection(&selection, catalog, registry)
}

pub fn configure_selection(
    selection: &AttributeSelection,
    catalog: &Catalog,
    registry: &RuleRegistry,
) -> Result<ConfigurationResult, ConfigureError> {
    let validation = catalog.validate(selection);
    let evaluation = registry.evaluate(&validation.selection)?;
    let blocked_by_combination = evaluation.is_blocked();

    let base_total = catalog.price(&validation.selection)?;
    let total = base_total
        .checked_add(evaluation.adjustment)
        .ok_or(PricingError::Overflow)?;

    Ok(ConfigurationResult {
        validated: validation.selection,
        cleared: validation.cleared,
        base_total,
        adjustment: evaluation.adjustment,
        total,
        applicable_pricing_rules: evaluation.applicable_pricing_rules,
        blocked_by_combination,
        blocking_rules: evaluation.blocking_rules,
    })
}

/// One configurator: a catalog snapshot plus the rules registered against it.
///
/// Instances share nothing unless they are handed the same `Arc`s.
#[derive(Debug, Clone)]
pub struct Configurator {
    catalog: Arc<Catalog>,
    registry: Arc<RuleRegistry>,
}

impl Configurator {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_registry(Arc::new(catalog), Arc::new(RuleRegistry::new()))
    }

    pub fn with_registry(catalog: Arc<Catalog>, registry: Arc<RuleRegistry>) -> Self {
        Self { catalog, registry }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn configure(&self, raw: &RawSelection) -> Result<ConfigurationResult, ConfigureError> {
        configure(raw, &self.catalog, &self.registry)
    }

    pub fn configure_selection(
        &self,
        selection: &AttributeSelection,
    ) -> Result<ConfigurationResult, ConfigureError> {
        configure_selection(selection, &self.catalog, &self.registry)
    }
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}
