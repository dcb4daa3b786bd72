//! Domain layer - Core types and port definitions
//!
//! This module defines the orchestrator port the frontend talks to, following
//! hexagonal architecture principles.

pub mod ports;

pub use ports::*;
