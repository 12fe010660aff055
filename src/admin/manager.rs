//! Admin manager
//!
//! Owns the resolved admin registry and the per-namespace command registry
//! facades handed to consumers.

use crate::access_control::PermissionKey;
use crate::admin::registry::{Admin, AdminRegistry};
use crate::commands::{AdminCommandRegistry, CommandManager};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Entry point for consumers of resolved admin permissions
///
/// The admin registry is immutable and shared. The facade cache is the only
/// mutable state; creation and removal both go through one lock.
pub struct AdminManager {
    admins: Arc<AdminRegistry>,
    commands: Arc<dyn CommandManager>,
    registries: Mutex<HashMap<PermissionKey, Arc<AdminCommandRegistry>>>,
}

impl AdminManager {
    pub fn new(admins: AdminRegistry, commands: Arc<dyn CommandManager>) -> Self {
        Self::with_shared(Arc::new(admins), commands)
    }

    pub fn with_shared(admins: Arc<AdminRegistry>, commands: Arc<dyn CommandManager>) -> Self {
        Self {
            admins,
            commands,
            registries: Mutex::new(HashMap::new()),
        }
    }

    /// Load the manifest at `path` and build a manager around it
    pub fn from_manifest_file(
        path: &str,
        commands: Arc<dyn CommandManager>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(AdminRegistry::from_file(path)?, commands))
    }

    pub fn admins(&self) -> &Arc<AdminRegistry> {
        &self.admins
    }

    pub fn get_admin(&self, identity: u64) -> Option<&Admin> {
        self.admins.get(identity)
    }

    /// Command registry facade for `namespace`, created on first request.
    ///
    /// Namespaces are case-insensitive; repeated calls return the same instance.
    pub fn command_registry(&self, namespace: &str) -> Arc<AdminCommandRegistry> {
        let mut registries = self.lock_registries();

        registries
            .entry(PermissionKey::new(namespace))
            .or_insert_with(|| {
                debug!(namespace, "Creating admin command registry");
                Arc::new(AdminCommandRegistry::new(
                    namespace,
                    self.commands.registry(namespace),
                    Arc::clone(&self.admins),
                ))
            })
            .clone()
    }

    /// Drop the cached facade for a disconnected namespace.
    ///
    /// Commands it registered are cleaned up by the command system itself.
    /// Returns whether a facade was cached.
    pub fn on_library_disconnect(&self, namespace: &str) -> bool {
        let removed = self
            .lock_registries()
            .remove(&PermissionKey::new(namespace))
            .is_some();

        if removed {
            info!(namespace, "Removed admin command registry");
        }
        removed
    }

    /// Number of cached facades
    pub fn registry_count(&self) -> usize {
        self.lock_registries().len()
    }

    // Poisoned locks are recovered, logging a warning
    fn lock_registries(&self) -> MutexGuard<'_, HashMap<PermissionKey, Arc<AdminCommandRegistry>>> {
        self.registries.lock().unwrap_or_else(|poisoned| {
            warn!("admin command registry lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
