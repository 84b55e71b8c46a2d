//! Platform events fanned out to extensions
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::sync::Arc;

use crate::interaction::Interaction;

/// A typed event delivered by the platform layer
///
/// Interactions are shared behind `Arc` because one event may pass through
/// several extensions' handlers concurrently with in-flight dispatches.
#[derive(Debug, Clone)]
pub enum Event {
    /// The client session became ready
    Ready,
    /// An interaction (command or component) was received
    InteractionCreate(Arc<Interaction>),
}

/// Discriminant used to match events against registered handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    InteractionCreate,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Ready => EventKind::Ready,
            Event::InteractionCreate(_) => EventKind::InteractionCreate,
        }
    }
}
