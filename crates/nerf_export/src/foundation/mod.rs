//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations (double precision, world-space conventions of the host)
//! - Logging utilities

pub mod math;
pub mod logging;
