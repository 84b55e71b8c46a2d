//! # Client Assembly
//!
//! Owns the registered extensions and the shared command registry, and
//! exposes the single `dispatch` entry the platform layer feeds events into.
//! The client never touches the transport; connecting, heartbeats and
//! payload upload stay with the host.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::sync::Arc;

use anyhow::Result;
use log::info;
use serde_json::Value;

use crate::commands::CommandRegistry;
use crate::dispatcher::{CommandDispatcher, InteractionResponder};
use crate::event::Event;
use crate::extension::Extension;

/// In-process assembly of extensions and commands
///
/// Registration is a startup activity; once the host starts feeding events
/// the command set is treated as immutable.
#[derive(Default)]
pub struct Client {
    commands: Arc<CommandRegistry>,
    extensions: Vec<Extension>,
}

impl Client {
    pub fn new() -> Self {
        Self {
            commands: Arc::new(CommandRegistry::new()),
            extensions: Vec::new(),
        }
    }

    /// The shared command registry
    pub fn commands(&self) -> &Arc<CommandRegistry> {
        &self.commands
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Activate an extension: install its commands into the registry and
    /// start routing events to its handlers
    pub fn register_extension(&mut self, extension: Extension) {
        for command in extension.commands() {
            self.commands.register(Arc::clone(command));
        }

        info!(
            "Registered extension '{}' with {} command(s)",
            extension.name(),
            extension.commands().len()
        );
        self.extensions.push(extension);
    }

    /// Deactivate an extension: its event handlers stop receiving events
    ///
    /// Registry entries stay put: the registered command set is stable for
    /// the life of the process even when the extension that brought a
    /// command goes away.
    pub fn unregister_extension(&mut self, name: &str) -> Option<Extension> {
        let index = self
            .extensions
            .iter()
            .position(|extension| extension.name() == name)?;

        info!("Unregistered extension '{name}'");
        Some(self.extensions.remove(index))
    }

    /// Install a command dispatcher extension wired to this registry
    pub fn install_command_dispatcher(&mut self, responder: Option<Arc<dyn InteractionResponder>>) {
        let mut dispatcher = CommandDispatcher::new(Arc::clone(&self.commands));

        if let Some(responder) = responder {
            dispatcher = dispatcher.with_responder(responder);
        }

        self.register_extension(dispatcher.into_extension());
    }

    /// Registration payloads for every command, for the host to upload to
    /// the platform
    pub fn command_payloads(&self) -> Vec<Value> {
        self.commands.registration_payloads()
    }

    /// Feed one platform event through every registered extension
    pub async fn dispatch(&self, event: Event) -> Result<()> {
        for extension in &self.extensions {
            extension.dispatch(&event).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{
        Command, CommandContext, CommandHandler, HandlerCallback, JsonCommandBuilder,
    };
    use crate::interaction::{Interaction, InteractionKind, User};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recorder {
        hits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl HandlerCallback for Recorder {
        async fn invoke(&self, _command: &Command, _ctx: &CommandContext) -> Result<()> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn ping_extension() -> (Extension, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let command = Command::new(Box::new(JsonCommandBuilder::new(
            "ping",
            json!({ "name": "ping", "description": "pong" }),
        )))
        .with_handler(CommandHandler::default_handler(Arc::new(Recorder {
            hits: Arc::clone(&hits),
        })));

        (
            Extension::new("utility").with_command(Arc::new(command)),
            hits,
        )
    }

    fn ping_event() -> Event {
        Event::InteractionCreate(Arc::new(Interaction {
            id: "i1".to_string(),
            command_id: Some("c1".to_string()),
            command_name: Some("ping".to_string()),
            guild_id: None,
            channel_id: "ch1".to_string(),
            user: User {
                id: "u1".to_string(),
                name: "tester".to_string(),
            },
            member: None,
            kind: InteractionKind::ChatInput { options: vec![] },
        }))
    }

    #[tokio::test]
    async fn test_register_extension_installs_commands() {
        let mut client = Client::new();
        let (extension, _) = ping_extension();

        client.register_extension(extension);

        assert!(client.commands().contains("ping"));
        assert_eq!(client.command_payloads().len(), 1);
        assert_eq!(client.command_payloads()[0]["name"], "ping");
    }

    #[tokio::test]
    async fn test_dispatch_reaches_command_handler() {
        let mut client = Client::new();
        let (extension, hits) = ping_extension();

        client.register_extension(extension);
        client.install_command_dispatcher(None);

        client.dispatch(ping_event()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unregister_stops_events_but_keeps_commands() {
        let mut client = Client::new();
        let (extension, hits) = ping_extension();

        client.register_extension(extension);
        client.install_command_dispatcher(None);

        let removed = client.unregister_extension("command-dispatcher");
        assert!(removed.is_some());

        client.dispatch(ping_event()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        // the command set outlives the extension
        assert!(client.commands().contains("ping"));
    }

    #[tokio::test]
    async fn test_unregister_unknown_extension() {
        let mut client = Client::new();
        assert!(client.unregister_extension("ghost").is_none());
    }
}
