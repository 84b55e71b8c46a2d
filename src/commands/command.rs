//! Command definition: identity, checks, keyed handlers and the data hook
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with explicit handler/check registration

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use super::context::CommandContext;
use super::handler::{CommandHandler, HandlerKey};
use crate::checks::{run_checks, CommandCheck};
use crate::interaction::Interaction;

/// Produces the wire-format registration payload for a command
///
/// Consumed opaquely: the core only reads the name and hands the JSON to the
/// host for upload.
pub trait CommandBuilder: Send + Sync {
    fn name(&self) -> &str;
    fn to_json(&self) -> Value;
}

/// Stock [`CommandBuilder`] wrapping a prebuilt JSON payload
pub struct JsonCommandBuilder {
    name: String,
    payload: Value,
}

impl JsonCommandBuilder {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

impl CommandBuilder for JsonCommandBuilder {
    fn name(&self) -> &str {
        &self.name
    }

    fn to_json(&self) -> Value {
        self.payload.clone()
    }
}

/// Per-command hook supplying the auxiliary `data` bag
///
/// Runs after command-level checks pass and before any handler is invoked.
#[async_trait]
pub trait DataHook: Send + Sync {
    async fn data(&self, interaction: &Interaction) -> Result<HashMap<String, Value>>;
}

/// A registered command: unique name, ordered command-level checks, handlers
/// keyed by `(group, name)`, and an optional data hook
///
/// Checks and handlers may be appended after construction (the registration
/// window is open), but there is no removal: once dispatch begins the set is
/// expected to stay stable for the life of the process.
pub struct Command {
    builder: Box<dyn CommandBuilder>,
    checks: Vec<Arc<CommandCheck>>,
    handlers: HashMap<HandlerKey, CommandHandler>,
    data_hook: Option<Arc<dyn DataHook>>,
}

impl Command {
    pub fn new(builder: Box<dyn CommandBuilder>) -> Self {
        Self {
            builder,
            checks: Vec::new(),
            handlers: HashMap::new(),
            data_hook: None,
        }
    }

    /// Platform-facing command name, read off the builder
    pub fn name(&self) -> &str {
        self.builder.name()
    }

    /// Registration payload for the host to upload
    pub fn registration_json(&self) -> Value {
        self.builder.to_json()
    }

    /// Append a command-level check; evaluation order is registration order
    pub fn add_check(&mut self, check: Arc<CommandCheck>) {
        self.checks.push(check);
    }

    pub fn with_check(mut self, check: Arc<CommandCheck>) -> Self {
        self.add_check(check);
        self
    }

    pub fn checks(&self) -> &[Arc<CommandCheck>] {
        &self.checks
    }

    /// Register a handler under its key; a second registration at the same
    /// key silently replaces the first (last write wins)
    pub fn add_handler(&mut self, handler: CommandHandler) {
        let key = handler.key.clone();

        if self.handlers.insert(key.clone(), handler).is_some() {
            debug!("Handler for {key:?} on command '{}' replaced", self.name());
        }
    }

    pub fn with_handler(mut self, handler: CommandHandler) -> Self {
        self.add_handler(handler);
        self
    }

    pub fn handler(&self, key: &HandlerKey) -> Option<&CommandHandler> {
        self.handlers.get(key)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn set_data_hook(&mut self, hook: Arc<dyn DataHook>) {
        self.data_hook = Some(hook);
    }

    pub fn with_data_hook(mut self, hook: Arc<dyn DataHook>) -> Self {
        self.set_data_hook(hook);
        self
    }

    /// Build the invocation context for an interaction targeting this command
    pub fn context(&self, interaction: Arc<Interaction>) -> CommandContext {
        CommandContext::from_interaction(interaction)
    }

    /// Evaluate the command-level checks against a context
    pub async fn run_checks(&self, ctx: &CommandContext) -> Result<bool> {
        run_checks(ctx, &self.checks).await
    }

    /// Run the data hook, defaulting to an empty record when none is set
    pub async fn data(&self, interaction: &Interaction) -> Result<HashMap<String, Value>> {
        match &self.data_hook {
            Some(hook) => hook.data(interaction).await,
            None => Ok(HashMap::new()),
        }
    }
}
