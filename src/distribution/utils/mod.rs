//! Shared helpers for the distribution pipeline.

pub mod fs;
