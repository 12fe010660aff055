//! Command registration surface
//!
//! The host's command system is an external collaborator. This module only
//! describes the surface it exposes (`CommandManager` / `CommandRegistry`)
//! and wraps it in [`AdminCommandRegistry`], which gates commands on the
//! permissions resolved by the admin registry.

pub mod admin;

pub use admin::AdminCommandRegistry;

use std::sync::Arc;

/// A connected client issuing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClient {
    /// Identity matched against admin identities
    pub identity: u64,
    /// Display name
    pub name: String,
}

impl CommandClient {
    pub fn new(identity: u64, name: impl Into<String>) -> Self {
        Self {
            identity,
            name: name.into(),
        }
    }
}

/// A command invocation as typed by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    pub command: String,
    pub args: Vec<String>,
}

impl CommandArgs {
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Handler for commands issued by clients
pub type ClientCommandHandler = Arc<dyn Fn(&CommandClient, &CommandArgs) + Send + Sync>;

/// Handler for commands issued from the server console
pub type ServerCommandHandler = Arc<dyn Fn(&CommandArgs) + Send + Sync>;

/// Handler for commands accepted from either; `None` is the server console
pub type GenericCommandHandler = Arc<dyn Fn(Option<&CommandClient>, &CommandArgs) + Send + Sync>;

/// Command registration scoped to one namespace
pub trait CommandRegistry: Send + Sync {
    fn register_client_command(&self, command: &str, handler: ClientCommandHandler);

    fn register_server_command(
        &self,
        command: &str,
        handler: ServerCommandHandler,
        description: &str,
    );

    fn register_generic_command(
        &self,
        command: &str,
        handler: GenericCommandHandler,
        description: &str,
    );
}

/// Hands out one command registry per namespace
pub trait CommandManager: Send + Sync {
    fn registry(&self, namespace: &str) -> Arc<dyn CommandRegistry>;
}
