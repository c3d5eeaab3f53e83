//! Typed change notifications.
//!
//! Mutations publish a discriminated change kind so consumers can
//! selectively re-fetch instead of reloading everything on every change.

use serde::{Deserialize, Serialize};

/// What category of data changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// One or more steps were created, updated or deleted.
    Step,
    /// One or more products were created, updated or deleted.
    Product,
}

/// Broadcast payload delivered to subscribed consumers.
///
/// Delivery is best-effort: the event only signals that data of the given
/// kind changed, so a consumer must re-fetch rather than trust any payload
/// for strict ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The category of data that changed.
    pub kind: ChangeKind,
}
