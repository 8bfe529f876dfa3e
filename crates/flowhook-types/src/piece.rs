//! Resolved piece trigger definitions.

use serde::{Deserialize, Serialize};

/// How a piece trigger receives events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerStrategy {
    /// Events pushed by an app to a shared endpoint and routed by listener.
    AppWebhook,
    /// Events delivered to a per-flow webhook URL.
    Webhook,
    /// The worker polls the source on a repeating schedule.
    Polling,
    /// No automatic activation. Also the fallback for unknown strategies.
    #[serde(other)]
    Manual,
}

impl std::fmt::Display for TriggerStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerStrategy::AppWebhook => write!(f, "APP_WEBHOOK"),
            TriggerStrategy::Webhook => write!(f, "WEBHOOK"),
            TriggerStrategy::Polling => write!(f, "POLLING"),
            TriggerStrategy::Manual => write!(f, "MANUAL"),
        }
    }
}

/// How a webhook trigger keeps its external subscription alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenewConfiguration {
    /// A repeating job re-registers the webhook on a cron schedule.
    Cron {
        /// Five-field cron expression.
        cron_expression: String,
    },
    /// No renewal job. Also the fallback for unknown renewal strategies.
    #[serde(other)]
    None,
}

/// Read-only description of a piece trigger, as published by the piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceTriggerDefinition {
    /// Trigger name within the piece.
    pub name: String,
    /// Display name shown in the builder.
    #[serde(default)]
    pub display_name: String,
    /// Activation strategy.
    #[serde(rename = "type")]
    pub strategy: TriggerStrategy,
    /// Renewal policy, only meaningful for [`TriggerStrategy::Webhook`].
    #[serde(default)]
    pub renew_configuration: Option<RenewConfiguration>,
}

impl PieceTriggerDefinition {
    /// Create a definition with the given strategy and no renewal policy.
    pub fn new(name: impl Into<String>, strategy: TriggerStrategy) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            strategy,
            renew_configuration: None,
        }
    }

    /// Attach a renewal policy.
    pub fn with_renew_configuration(mut self, renew: RenewConfiguration) -> Self {
        self.renew_configuration = Some(renew);
        self
    }

    /// Whether the webhook is renewed by a cron job.
    pub fn renews_by_cron(&self) -> bool {
        matches!(
            self.renew_configuration,
            Some(RenewConfiguration::Cron { .. })
        )
    }
}
