//! # Extensions
//!
//! An extension bundles commands and event handlers that ship together. Event
//! handlers are plain adapter values (check list + listener) walked by one
//! fixed dispatch routine; there are no per-registration closures and no
//! global keyed-by-name tables.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with adapter-value event handlers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::checks::{run_checks, EventCheck};
use crate::commands::Command;
use crate::event::{Event, EventKind};

/// Listener invoked once an event handler's checks pass
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn handle(&self, event: &Event) -> Result<()>;
}

/// Adapter binding an event kind, a check list and a listener
pub struct EventHandler {
    event: EventKind,
    once: bool,
    checks: Vec<Arc<EventCheck>>,
    listener: Arc<dyn EventListener>,
    fired: AtomicBool,
}

impl EventHandler {
    pub fn new(event: EventKind, listener: Arc<dyn EventListener>) -> Self {
        Self {
            event,
            once: false,
            checks: Vec::new(),
            listener,
            fired: AtomicBool::new(false),
        }
    }

    /// Handler consumed by its first matching event, whether or not the
    /// checks let the listener run
    pub fn once(event: EventKind, listener: Arc<dyn EventListener>) -> Self {
        Self {
            once: true,
            ..Self::new(event, listener)
        }
    }

    /// Append an event-level check; evaluated in registration order
    pub fn with_check(mut self, check: Arc<EventCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn event(&self) -> EventKind {
        self.event
    }
}

/// A named bundle of commands and event handlers
///
/// The extension owns its commands; a client installs them into the shared
/// registry on registration and stops routing events here on
/// deregistration.
#[derive(Default)]
pub struct Extension {
    name: String,
    commands: Vec<Arc<Command>>,
    event_handlers: Vec<EventHandler>,
}

impl Extension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
            event_handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_command(&mut self, command: Arc<Command>) {
        self.commands.push(command);
    }

    pub fn with_command(mut self, command: Arc<Command>) -> Self {
        self.add_command(command);
        self
    }

    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }

    pub fn add_event_handler(&mut self, handler: EventHandler) {
        self.event_handlers.push(handler);
    }

    pub fn with_event_handler(mut self, handler: EventHandler) -> Self {
        self.add_event_handler(handler);
        self
    }

    /// Route one event through every matching handler
    ///
    /// For each handler whose kind matches: run its checks; on pass, invoke
    /// the listener. Check errors and listener errors propagate to the
    /// caller, who owns logging and user-visible reporting.
    pub async fn dispatch(&self, event: &Event) -> Result<()> {
        for handler in &self.event_handlers {
            if handler.event != event.kind() {
                continue;
            }

            if handler.once && handler.fired.swap(true, Ordering::SeqCst) {
                continue;
            }

            if run_checks(event, &handler.checks).await? {
                handler.listener.handle(event).await?;
            } else {
                debug!(
                    "Event {:?} denied by checks in extension '{}'",
                    event.kind(),
                    self.name
                );
            }
        }

        Ok(())
    }
}
