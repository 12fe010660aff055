//! Permission-gated command registry
//!
//! Each consumer namespace gets one [`AdminCommandRegistry`]. Permissions it
//! checks are scoped to the namespace: registering `ban` with permission
//! `Ban` from namespace `Moderation` requires `Moderation:Ban`.

use crate::access_control::{AccessDecision, SEPARATOR};
use crate::admin::AdminRegistry;
use crate::commands::{
    ClientCommandHandler, CommandArgs, CommandClient, CommandRegistry, GenericCommandHandler,
    ServerCommandHandler,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Command registry facade for one namespace
pub struct AdminCommandRegistry {
    namespace: String,
    inner: Arc<dyn CommandRegistry>,
    admins: Arc<AdminRegistry>,
}

impl AdminCommandRegistry {
    pub fn new(
        namespace: impl Into<String>,
        inner: Arc<dyn CommandRegistry>,
        admins: Arc<AdminRegistry>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            inner,
            admins,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `<namespace>:<permission>`
    pub fn scoped_permission(&self, permission: &str) -> String {
        format!("{}{}{}", self.namespace, SEPARATOR, permission)
    }

    /// Whether `identity` holds the namespace-scoped `permission`
    pub fn has_permission(&self, identity: u64, permission: &str) -> bool {
        self.admins
            .has_permission(identity, &self.scoped_permission(permission))
    }

    pub fn check(&self, identity: u64, permission: &str) -> AccessDecision {
        self.admins
            .check(identity, &self.scoped_permission(permission))
    }

    /// Register a client command that only runs for admins holding the
    /// scoped permission.
    pub fn register_admin_command(
        &self,
        command: &str,
        permission: &str,
        handler: ClientCommandHandler,
    ) {
        let gate = Gate::new(command, self.scoped_permission(permission), &self.admins);
        debug!(
            namespace = %self.namespace,
            command,
            permission = %gate.permission,
            "Registering admin command"
        );

        self.inner.register_client_command(
            command,
            Arc::new(move |client: &CommandClient, args: &CommandArgs| {
                if gate.allows(client) {
                    handler(client, args);
                }
            }),
        );
    }

    /// Register a command accepted from the console and from clients.
    ///
    /// The console is always trusted; clients need the scoped permission.
    pub fn register_generic_admin_command(
        &self,
        command: &str,
        permission: &str,
        handler: GenericCommandHandler,
        description: &str,
    ) {
        let gate = Gate::new(command, self.scoped_permission(permission), &self.admins);
        debug!(
            namespace = %self.namespace,
            command,
            permission = %gate.permission,
            "Registering generic admin command"
        );

        self.inner.register_generic_command(
            command,
            Arc::new(move |client: Option<&CommandClient>, args: &CommandArgs| {
                if client.is_none_or(|client| gate.allows(client)) {
                    handler(client, args);
                }
            }),
            description,
        );
    }

    /// Console-only command, registered unchanged
    pub fn register_server_command(
        &self,
        command: &str,
        handler: ServerCommandHandler,
        description: &str,
    ) {
        self.inner
            .register_server_command(command, handler, description);
    }
}

impl fmt::Debug for AdminCommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCommandRegistry")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// Permission check captured by a wrapped handler
struct Gate {
    command: String,
    permission: String,
    admins: Arc<AdminRegistry>,
}

impl Gate {
    fn new(command: &str, permission: String, admins: &Arc<AdminRegistry>) -> Self {
        Self {
            command: command.to_string(),
            permission,
            admins: Arc::clone(admins),
        }
    }

    fn allows(&self, client: &CommandClient) -> bool {
        match self.admins.check(client.identity, &self.permission) {
            AccessDecision::Allowed => true,
            AccessDecision::Denied(reason) => {
                warn!(
                    command = %self.command,
                    client = %client.name,
                    identity = client.identity,
                    permission = %self.permission,
                    reason = %reason,
                    "Admin command denied"
                );
                false
            }
        }
    }
}
