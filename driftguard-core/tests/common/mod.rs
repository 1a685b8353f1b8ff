//! Common test utilities for integration tests
//!
//! This module provides:
//! - Deterministic series generators (ramps, steps, flat windows)
//! - Seeded Gaussian noise for reproducible "field" data
//! - Maintenance history builders

#![allow(dead_code)]

pub mod generators;

pub use generators::*;
