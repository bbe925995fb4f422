//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod config_gateway;
pub mod edit_journal;
pub mod notifier;
