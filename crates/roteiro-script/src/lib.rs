//! Roteiro — script graph data model and step repository.
//!
//! A script is a directed graph of steps; each step carries the text the
//! operator reads, the buttons that leave it, and optional annotations.
//! The repository is the single owner of that data: lookups are synchronous
//! against in-memory state, mutations invalidate the derived caches and
//! hand their documents to the synchronization layer.

pub mod application;
pub mod domain;

pub use application::repository::{PRODUCTS_KEY, STEPS_KEY, ScriptRepository};
pub use domain::annotations::{Alert, DEFAULT_ALERT_TITLE, Tabulation};
pub use domain::ids::{ButtonId, ProductId, SegmentId, StepId};
pub use domain::model::{
    Alignment, Button, ContentSegment, FontSize, ListKind, Product, SegmentStyle, Step,
    StepFormatting,
};
