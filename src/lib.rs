//! COTON Check evaluation workflows.
//!
//! The library hosts the recruitment-mission domain (weighted scorecard
//! generation, reviewer evaluation intake, merged candidate reports) plus the
//! configuration, telemetry, and error plumbing shared by the binary.

pub mod config;
pub mod error;
pub mod infra;
pub mod telemetry;
pub mod workflows;
