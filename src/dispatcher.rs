//! # Command Dispatcher
//!
//! Top-level control flow for command interactions: look up the command,
//! build the invocation context, run command-level checks, populate the data
//! bag, resolve the target handler, run its checks and invoke it. Every
//! resolution miss is a silent no-op; check errors and handler failures
//! propagate to the dispatch caller.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Unregistered sub-command keys resolve to nothing instead of falling back to the default handler
//! - 1.0.0: Initial implementation

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::checks::run_checks;
use crate::commands::{AutoDefer, Command, CommandHandler, CommandRegistry, HandlerKey};
use crate::event::{Event, EventKind};
use crate::extension::{EventHandler, EventListener, Extension};
use crate::interaction::{Interaction, InteractionKind};

/// Platform-side acknowledge operation, applied for handlers carrying an
/// auto-defer policy; the core never acknowledges interactions on its own
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn defer(&self, interaction: &Interaction, policy: AutoDefer) -> Result<()>;
}

/// Routes command interactions from the event stream to registered handlers
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
    responder: Option<Arc<dyn InteractionResponder>>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            responder: None,
        }
    }

    pub fn with_responder(mut self, responder: Arc<dyn InteractionResponder>) -> Self {
        self.responder = Some(responder);
        self
    }

    /// Wrap the dispatcher in an extension listening for interaction events
    pub fn into_extension(self) -> Extension {
        Extension::new("command-dispatcher").with_event_handler(EventHandler::new(
            EventKind::InteractionCreate,
            Arc::new(self),
        ))
    }

    /// Pick the handler an interaction targets
    ///
    /// Context-menu commands and chat input without a sub-command use the
    /// reserved default key. A named sub-command resolves to exactly its
    /// `(group, name)` key; when that key is unregistered the resolution
    /// yields nothing — there is no fallback to the default handler.
    fn resolve_handler<'a>(
        command: &'a Command,
        interaction: &Interaction,
    ) -> Option<&'a CommandHandler> {
        match &interaction.kind {
            InteractionKind::ChatInput { .. } => {
                let (group, name) = interaction.subcommand_path();

                match name {
                    None => command.handler(&HandlerKey::default_key()),
                    Some(name) => command.handler(&HandlerKey::new(group, name)),
                }
            }
            InteractionKind::ContextMenu => command.handler(&HandlerKey::default_key()),
            _ => None,
        }
    }

    /// Dispatch one command interaction end to end
    pub async fn handle_interaction(&self, interaction: &Arc<Interaction>) -> Result<()> {
        if !interaction.is_command() {
            return Ok(());
        }

        let Some(name) = interaction.command_name.as_deref() else {
            return Ok(());
        };

        // unresolved names are not errors: the command may belong to another
        // process or deployment version
        let Some(command) = self.registry.get(name) else {
            debug!("No command registered for '{name}', ignoring");
            return Ok(());
        };

        let mut ctx = command.context(Arc::clone(interaction));

        if !command.run_checks(&ctx).await? {
            debug!("Command '{name}' denied by command-level checks");
            return Ok(());
        }

        ctx.data = command.data(interaction).await?;

        let Some(handler) = Self::resolve_handler(&command, interaction) else {
            debug!("No handler resolved for '{name}', ignoring");
            return Ok(());
        };

        if let (Some(responder), Some(policy)) = (&self.responder, handler.auto_defer) {
            responder.defer(interaction, policy).await?;
        }

        if !run_checks(&ctx, &handler.checks).await? {
            debug!("Handler {:?} on '{name}' denied by handler-level checks", handler.key);
            return Ok(());
        }

        handler.callback.invoke(&command, &ctx).await
    }
}

#[async_trait]
impl EventListener for CommandDispatcher {
    async fn handle(&self, event: &Event) -> Result<()> {
        match event {
            Event::InteractionCreate(interaction) => self.handle_interaction(interaction).await,
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Check;
    use crate::commands::{CommandContext, DataHook, HandlerCallback, JsonCommandBuilder};
    use crate::interaction::{CommandOption, OptionValue, User};
    use serde_json::{json, Value};
    use std::collections::HashMap;
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

    fn recorder() -> (Arc<Recorder>, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        (
            Arc::new(Recorder {
                hits: Arc::clone(&hits),
            }),
            hits,
        )
    }

    struct Gate {
        open: bool,
    }

    #[async_trait]
    impl Check<CommandContext> for Gate {
        async fn check(&self, _ctx: &CommandContext) -> Result<bool> {
            Ok(self.open)
        }
    }

    fn interaction(name: &str, kind: InteractionKind) -> Arc<Interaction> {
        Arc::new(Interaction {
            id: "i1".to_string(),
            command_id: Some("c1".to_string()),
            command_name: Some(name.to_string()),
            guild_id: Some("g1".to_string()),
            channel_id: "ch1".to_string(),
            user: User {
                id: "u1".to_string(),
                name: "tester".to_string(),
            },
            member: None,
            kind,
        })
    }

    fn subcommand_interaction(name: &str, group: Option<&str>, sub: &str) -> Arc<Interaction> {
        let sub = CommandOption::subcommand(sub, vec![]);
        let options = match group {
            Some(group) => vec![CommandOption::subcommand_group(group, vec![sub])],
            None => vec![sub],
        };

        interaction(name, InteractionKind::ChatInput { options })
    }

    fn dispatcher_for(command: Command) -> CommandDispatcher {
        let registry = Arc::new(CommandRegistry::new());
        registry.register(Arc::new(command));
        CommandDispatcher::new(registry)
    }

    fn moderate_command() -> (Command, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let (default_callback, default_hits) = recorder();
        let (ban_callback, ban_hits) = recorder();

        let command = Command::new(Box::new(JsonCommandBuilder::new(
            "moderate",
            json!({ "name": "moderate" }),
        )))
        .with_handler(CommandHandler::default_handler(default_callback))
        .with_handler(CommandHandler::subcommand(
            Some("admin"),
            "ban",
            ban_callback,
        ));

        (command, default_hits, ban_hits)
    }

    #[tokio::test]
    async fn test_subcommand_resolves_exact_handler() {
        let (command, default_hits, ban_hits) = moderate_command();
        let dispatcher = dispatcher_for(command);

        dispatcher
            .handle_interaction(&subcommand_interaction("moderate", Some("admin"), "ban"))
            .await
            .unwrap();

        assert_eq!(ban_hits.load(Ordering::SeqCst), 1);
        assert_eq!(default_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unregistered_subcommand_is_silent_noop() {
        let (command, default_hits, ban_hits) = moderate_command();
        let dispatcher = dispatcher_for(command);

        // "kick" has no handler; nothing runs, no error, no default fallback
        dispatcher
            .handle_interaction(&subcommand_interaction("moderate", Some("admin"), "kick"))
            .await
            .unwrap();

        assert_eq!(ban_hits.load(Ordering::SeqCst), 0);
        assert_eq!(default_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_subcommand_invokes_default() {
        let (command, default_hits, ban_hits) = moderate_command();
        let dispatcher = dispatcher_for(command);

        dispatcher
            .handle_interaction(&interaction(
                "moderate",
                InteractionKind::ChatInput {
                    options: vec![CommandOption::leaf(
                        "reason",
                        OptionValue::String("spam".to_string()),
                    )],
                },
            ))
            .await
            .unwrap();

        assert_eq!(default_hits.load(Ordering::SeqCst), 1);
        assert_eq!(ban_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_context_menu_uses_default_handler() {
        let (command, default_hits, _) = moderate_command();
        let dispatcher = dispatcher_for(command);

        dispatcher
            .handle_interaction(&interaction("moderate", InteractionKind::ContextMenu))
            .await
            .unwrap();

        assert_eq!(default_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_command_is_noop() {
        let registry = Arc::new(CommandRegistry::new());
        let dispatcher = CommandDispatcher::new(registry);

        dispatcher
            .handle_interaction(&interaction("ghost", InteractionKind::ContextMenu))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_component_interactions_are_ignored() {
        let (command, default_hits, _) = moderate_command();
        let dispatcher = dispatcher_for(command);

        dispatcher
            .handle_interaction(&interaction(
                "moderate",
                InteractionKind::Button {
                    custom_id: "x:1".to_string(),
                },
            ))
            .await
            .unwrap();

        assert_eq!(default_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_command_check_denial_blocks_handler() {
        let (command, default_hits, _) = moderate_command();
        let command = command.with_check(Arc::new(Gate { open: false }));
        let dispatcher = dispatcher_for(command);

        dispatcher
            .handle_interaction(&interaction("moderate", InteractionKind::ContextMenu))
            .await
            .unwrap();

        assert_eq!(default_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_check_denial_blocks_callback() {
        let (callback, hits) = recorder();
        let command = Command::new(Box::new(JsonCommandBuilder::new(
            "ping",
            json!({ "name": "ping" }),
        )))
        .with_handler(
            CommandHandler::default_handler(callback).with_check(Arc::new(Gate { open: false })),
        );
        let dispatcher = dispatcher_for(command);

        dispatcher
            .handle_interaction(&interaction("ping", InteractionKind::ContextMenu))
            .await
            .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_check_error_propagates() {
        struct Broken;

        #[async_trait]
        impl Check<CommandContext> for Broken {
            async fn check(&self, _ctx: &CommandContext) -> Result<bool> {
                Err(anyhow::anyhow!("check broke"))
            }
        }

        let (command, default_hits, _) = moderate_command();
        let command = command.with_check(Arc::new(Broken));
        let dispatcher = dispatcher_for(command);

        let result = dispatcher
            .handle_interaction(&interaction("moderate", InteractionKind::ContextMenu))
            .await;

        assert!(result.is_err());
        assert_eq!(default_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_failure_propagates() {
        struct Failing;

        #[async_trait]
        impl HandlerCallback for Failing {
            async fn invoke(&self, _command: &Command, _ctx: &CommandContext) -> Result<()> {
                Err(anyhow::anyhow!("handler broke"))
            }
        }

        let command = Command::new(Box::new(JsonCommandBuilder::new(
            "ping",
            json!({ "name": "ping" }),
        )))
        .with_handler(CommandHandler::default_handler(Arc::new(Failing)));
        let dispatcher = dispatcher_for(command);

        let result = dispatcher
            .handle_interaction(&interaction("ping", InteractionKind::ContextMenu))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_data_hook_runs_before_handler() {
        struct Hook;

        #[async_trait]
        impl DataHook for Hook {
            async fn data(&self, _interaction: &Interaction) -> Result<HashMap<String, Value>> {
                Ok(HashMap::from([("locale".to_string(), json!("en"))]))
            }
        }

        struct AssertsData;

        #[async_trait]
        impl HandlerCallback for AssertsData {
            async fn invoke(&self, _command: &Command, ctx: &CommandContext) -> Result<()> {
                assert_eq!(ctx.data.get("locale"), Some(&json!("en")));
                Ok(())
            }
        }

        let command = Command::new(Box::new(JsonCommandBuilder::new(
            "greet",
            json!({ "name": "greet" }),
        )))
        .with_data_hook(Arc::new(Hook))
        .with_handler(CommandHandler::default_handler(Arc::new(AssertsData)));
        let dispatcher = dispatcher_for(command);

        dispatcher
            .handle_interaction(&interaction("greet", InteractionKind::ContextMenu))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_auto_defer_goes_through_responder() {
        struct RecordingResponder {
            deferred: AtomicUsize,
        }

        #[async_trait]
        impl InteractionResponder for RecordingResponder {
            async fn defer(&self, _interaction: &Interaction, policy: AutoDefer) -> Result<()> {
                assert_eq!(policy, AutoDefer::Ephemeral);
                self.deferred.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let responder = Arc::new(RecordingResponder {
            deferred: AtomicUsize::new(0),
        });
        let (callback, hits) = recorder();

        let command = Command::new(Box::new(JsonCommandBuilder::new(
            "slow",
            json!({ "name": "slow" }),
        )))
        .with_handler(
            CommandHandler::default_handler(callback).with_auto_defer(AutoDefer::Ephemeral),
        );

        let registry = Arc::new(CommandRegistry::new());
        registry.register(Arc::new(command));
        let responder_arc: Arc<dyn InteractionResponder> = responder.clone();
        let dispatcher = CommandDispatcher::new(registry).with_responder(responder_arc);

        dispatcher
            .handle_interaction(&interaction("slow", InteractionKind::ContextMenu))
            .await
            .unwrap();

        assert_eq!(responder.deferred.load(Ordering::SeqCst), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
