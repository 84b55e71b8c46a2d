//! Command registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for command lookup by platform name

use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use serde_json::Value;

use super::command::Command;

/// Registry mapping command names to commands
///
/// Registration happens during startup; afterwards the registry is read
/// concurrently by every dispatch. Treat it as append-only once dispatch
/// begins.
///
/// # Example
///
/// ```ignore
/// let registry = CommandRegistry::new();
/// registry.register(Arc::new(ping_command));
///
/// if let Some(command) = registry.get("ping") {
///     // resolve and dispatch
/// }
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    commands: DashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: DashMap::new(),
        }
    }

    /// Register a command under its builder-declared name
    pub fn register(&self, command: Arc<Command>) {
        let name = command.name().to_string();
        debug!("Registered command '{name}'");
        self.commands.insert(name, command);
    }

    /// Get the command registered under `name`
    ///
    /// Returns None for unknown names; an unresolved name is a no-op at
    /// dispatch, never an error.
    pub fn get(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a command is registered
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All registered command names
    pub fn command_names(&self) -> Vec<String> {
        self.commands.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Registration payloads for every command, for the host to upload
    pub fn registration_payloads(&self) -> Vec<Value> {
        self.commands
            .iter()
            .map(|entry| entry.value().registration_json())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::command::JsonCommandBuilder;
    use serde_json::json;

    fn command(name: &str) -> Arc<Command> {
        Arc::new(Command::new(Box::new(JsonCommandBuilder::new(
            name,
            json!({ "name": name }),
        ))))
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register_single() {
        let registry = CommandRegistry::new();
        registry.register(command("ping"));

        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("ping"));
        assert!(!registry.contains("pong"));
    }

    #[test]
    fn test_registry_get_returns_command() {
        let registry = CommandRegistry::new();
        registry.register(command("test"));

        assert!(registry.get("test").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_payloads() {
        let registry = CommandRegistry::new();
        registry.register(command("ping"));
        registry.register(command("config"));

        let payloads = registry.registration_payloads();
        assert_eq!(payloads.len(), 2);

        let mut names = registry.command_names();
        names.sort();
        assert_eq!(names, vec!["config", "ping"]);
    }

    #[test]
    fn test_registry_default() {
        let registry = CommandRegistry::default();
        assert!(registry.is_empty());
    }
}
