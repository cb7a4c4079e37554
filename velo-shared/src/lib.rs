pub mod models;

pub use models::events::{ConfiguratorEvent, RuleKind, RuleUpsertedEvent, SelectionConfiguredEvent};
