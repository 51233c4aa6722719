//! Command implementations for the scan-image CLI
//!
//! Each command lives in its own module. A bare invocation runs `scan`.

pub mod config;
pub mod scan;
pub mod version;
