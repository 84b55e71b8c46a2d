//! Command handler trait and infrastructure
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with keyed handlers and per-handler checks

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::command::Command;
use super::context::CommandContext;
use crate::checks::CommandCheck;

/// Reserved name of the default handler: the key `(None, "run")` fires when
/// an invocation names no sub-command
pub const DEFAULT_HANDLER_NAME: &str = "run";

/// Composite handler key: optional sub-command group plus sub-command name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    pub group: Option<String>,
    pub name: String,
}

impl HandlerKey {
    pub fn new(group: Option<&str>, name: &str) -> Self {
        Self {
            group: group.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// The reserved default-handler key
    pub fn default_key() -> Self {
        Self {
            group: None,
            name: DEFAULT_HANDLER_NAME.to_string(),
        }
    }
}

/// Auto-deferral policy applied by the platform layer before a handler runs
///
/// Carried as data on the handler; the dispatcher hands it to an
/// [`InteractionResponder`](crate::dispatcher::InteractionResponder)
/// collaborator and never acknowledges interactions itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDefer {
    /// Acknowledge with an ephemeral placeholder
    Ephemeral,
    /// Acknowledge with a public placeholder
    Public,
}

/// Callback invoked once a handler is resolved and its checks pass
///
/// The callback receives the owning [`Command`] so shared command state is in
/// reach, mirroring a method bound to its instance. Its success value is
/// discarded by the dispatcher; errors propagate.
///
/// # Example
///
/// ```ignore
/// struct Ban;
///
/// #[async_trait]
/// impl HandlerCallback for Ban {
///     async fn invoke(&self, _command: &Command, ctx: &CommandContext) -> Result<()> {
///         let target = ctx.get_user("target");
///         // ...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait HandlerCallback: Send + Sync {
    async fn invoke(&self, command: &Command, ctx: &CommandContext) -> Result<()>;
}

/// A registered handler: key identity, its own check list, deferral policy
/// and the callback
pub struct CommandHandler {
    pub key: HandlerKey,
    pub checks: Vec<Arc<CommandCheck>>,
    pub auto_defer: Option<AutoDefer>,
    pub callback: Arc<dyn HandlerCallback>,
}

impl CommandHandler {
    pub fn new(key: HandlerKey, callback: Arc<dyn HandlerCallback>) -> Self {
        Self {
            key,
            checks: Vec::new(),
            auto_defer: None,
            callback,
        }
    }

    /// Handler registered at the reserved default key
    pub fn default_handler(callback: Arc<dyn HandlerCallback>) -> Self {
        Self::new(HandlerKey::default_key(), callback)
    }

    /// Handler registered for a sub-command, optionally inside a group
    pub fn subcommand(group: Option<&str>, name: &str, callback: Arc<dyn HandlerCallback>) -> Self {
        Self::new(HandlerKey::new(group, name), callback)
    }

    /// Append a handler-level check; evaluated after command-level checks
    /// pass, in registration order
    pub fn with_check(mut self, check: Arc<CommandCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn with_auto_defer(mut self, policy: AutoDefer) -> Self {
        self.auto_defer = Some(policy);
        self
    }

    pub fn add_check(&mut self, check: Arc<CommandCheck>) {
        self.checks.push(check);
    }
}
