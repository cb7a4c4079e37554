use std::fmt;

use chrono::Utc;
use uuid::Uuid;

/// Which rule collection an event or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Pricing,
    Combination,
}

impl RuleKind {
    fn title(&self) -> &'static str {
        match self {
            RuleKind::Pricing => "Pricing rule",
            RuleKind::Combination => "Combination rule",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Pricing => f.write_str("pricing"),
            RuleKind::Combination => f.write_str("combination"),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct RuleUpsertedEvent {
    pub event_id: Uuid,
    pub kind: RuleKind,
    pub rule_id: u64,
    pub created: bool,
    pub timestamp: i64,
}

impl RuleUpsertedEvent {
    pub fn new(kind: RuleKind, rule_id: u64, created: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            kind,
            rule_id,
            created,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Human-readable notification text for observers.
    pub fn message(&self) -> String {
        if self.created {
            format!("{} added successfully.", self.kind.title())
        } else {
            format!("{} with ID {} updated successfully.", self.kind.title(), self.rule_id)
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct SelectionConfiguredEvent {
    pub event_id: Uuid,
    pub selection: serde_json::Value, // Serialized validated AttributeSelection
    pub total: i32,
    pub blocked: bool,
    pub timestamp: i64,
}

impl SelectionConfiguredEvent {
    pub fn new(selection: serde_json::Value, total: i32, blocked: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            selection,
            total,
            blocked,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Everything the configurator tells its observers about.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub enum ConfiguratorEvent {
    RuleUpserted(RuleUpsertedEvent),
    SelectionConfigured(SelectionConfiguredEvent),
}
