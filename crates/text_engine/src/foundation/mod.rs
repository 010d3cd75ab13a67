//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the library:
//! - Math types and screen-space geometry
//! - Color representation and blending
//! - Logging utilities

pub mod color;
pub mod logging;
pub mod math;
