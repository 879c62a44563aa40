//! Service layer
//!
//! Wires the composition engine and the documentation pipeline behind one
//! object so the CLI only deals in strings.

pub mod discovery_service;

pub use discovery_service::{DEFAULT_NAMESPACE, DiscoveryService};
