//! Application layer: the step repository.

pub mod repository;
