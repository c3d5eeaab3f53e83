//! Domain types for the script graph.

pub mod annotations;
pub mod ids;
pub mod model;
