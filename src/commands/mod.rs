//! # Command System
//!
//! Commands, their keyed handlers, per-invocation contexts and the registry
//! dispatch resolves against.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with explicit registration (no global tables)

pub mod command;
pub mod context;
pub mod handler;
pub mod registry;

pub use command::{Command, CommandBuilder, DataHook, JsonCommandBuilder};
pub use context::{flatten_options, CommandContext};
pub use handler::{
    AutoDefer, CommandHandler, HandlerCallback, HandlerKey, DEFAULT_HANDLER_NAME,
};
pub use registry::CommandRegistry;
