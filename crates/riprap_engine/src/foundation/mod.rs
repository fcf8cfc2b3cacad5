//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Random sources for procedural generation
//! - Tick-driven time management
//! - Logging utilities

pub mod math;
pub mod random;
pub mod time;
pub mod logging;
