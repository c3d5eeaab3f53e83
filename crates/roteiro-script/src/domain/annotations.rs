//! Per-step annotations: alerts and tabulation recommendations.
//!
//! Annotations are surfaced to the operator alongside a step and never
//! influence transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when a previously saved alert is missing one.
pub const DEFAULT_ALERT_TITLE: &str = "Atenção";

/// An advisory call-closing-code recommendation attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tabulation {
    /// Tabulation code name.
    pub name: String,
    /// When to use it.
    #[serde(default)]
    pub description: String,
}

/// An alert shown to the operator when arriving at a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert title. May be empty in data saved by older editors.
    #[serde(default)]
    pub title: String,
    /// Alert body. A non-empty message is the sole activation condition.
    #[serde(default)]
    pub message: String,
    /// When the alert was authored.
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Build an alert from editor input. The editor only saves an alert when
    /// both fields are filled in; anything else means "not alerting".
    #[must_use]
    pub fn compose(title: &str, message: &str, now: DateTime<Utc>) -> Option<Self> {
        if title.trim().is_empty() || message.trim().is_empty() {
            return None;
        }
        Some(Self {
            title: title.trim().to_owned(),
            message: message.trim().to_owned(),
            created_at: now,
        })
    }

    /// Whether this alert should be surfaced. Stored alerts may predate the
    /// editor's both-fields rule, so only the message decides.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.message.trim().is_empty()
    }

    /// Title to render, falling back to the default for legacy alerts saved
    /// without one.
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_ALERT_TITLE
        } else {
            &self.title
        }
    }
}
