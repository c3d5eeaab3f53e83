//! Roteiro — script bundle import/export.
//!
//! Translates the external JSON bundle format into repository entries and
//! back out, and writes the per-product script report. Import is tolerant:
//! structurally invalid steps are itemized and skipped, valid ones land,
//! and re-importing a bundle replaces each product's steps instead of
//! appending.

mod bundle;
mod report;

pub use bundle::{END_OF_SCRIPT, ImportOutcome, export_bundle, import_bundle};
pub use report::script_report;
