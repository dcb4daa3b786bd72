//! Orchestrator Registry Module
//!
//! In-process implementation of the storage orchestrator port, holding the
//! backend inventory and the registered storage classes.

pub mod memory;

pub use memory::*;
