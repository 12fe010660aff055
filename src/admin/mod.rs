//! Admin module
//!
//! Resolved administrators, lookup by identity, and the manager that hands
//! out per-namespace command registries.

pub mod manager;
pub mod registry;

pub use manager::AdminManager;
pub use registry::{Admin, AdminRegistry};
