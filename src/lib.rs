//! # Switchboard
//!
//! Command dispatch framework for chat-platform bots. Registers commands and
//! stateful component handlers, gates execution behind composable
//! asynchronous checks, routes interactions to the right handler (including
//! sub-command routing), rate-limits usage per configurable scope, and
//! round-trips structured payloads through component identifiers.
//!
//! The platform transport is not here: a host process connects, uploads the
//! registration payloads from [`Client::command_payloads`], and feeds
//! normalized [`Event`]s into [`Client::dispatch`].

// Normalized platform model
pub mod event;
pub mod interaction;

// Gating predicates and the pipeline engine
pub mod checks;

// Scoped rate limiting
pub mod cooldown;

// Structured component identifiers
pub mod custom_id;

// Command system: definitions, contexts, keyed handlers, registry
pub mod commands;

// Extensions and top-level dispatch
pub mod client;
pub mod dispatcher;
pub mod extension;

// Re-export the types a host touches day to day
pub use checks::{
    run_checks, ButtonOnly, Check, CommandCheck, CooldownCheck, CooldownNotifier, CustomIdCheck,
    EventCheck, GuildOnly, HasPermissions, ModalSubmitOnly, SelectMenuOnly,
};
pub use client::Client;
pub use commands::{
    AutoDefer, Command, CommandBuilder, CommandContext, CommandHandler, CommandRegistry, DataHook,
    HandlerCallback, HandlerKey, JsonCommandBuilder, DEFAULT_HANDLER_NAME,
};
pub use cooldown::{
    BucketScope, BucketStorage, CooldownBucket, CooldownManager, CooldownStatus, CooldownStrategy,
    MemoryBucketStorage,
};
pub use custom_id::{CustomId, CustomIdError, CUSTOM_ID_MAX_LENGTH, CUSTOM_ID_SEPARATOR};
pub use dispatcher::{CommandDispatcher, InteractionResponder};
pub use event::{Event, EventKind};
pub use extension::{EventHandler, EventListener, Extension};
pub use interaction::{
    CommandOption, Interaction, InteractionKind, Member, OptionValue, Permissions, User,
};
