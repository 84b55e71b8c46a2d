//! Stock event-handler checks
//!
//! These gate raw events before a listener runs: kind filters narrow a
//! generic interaction listener to one component type, and
//! [`CustomIdCheck`] routes component identifiers to the definition that
//! owns them.

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Check;
use crate::custom_id::{matches_prefix, CustomId};
use crate::event::Event;
use crate::interaction::InteractionKind;

/// Passes only button interactions
pub struct ButtonOnly;

#[async_trait]
impl Check<Event> for ButtonOnly {
    async fn check(&self, event: &Event) -> Result<bool> {
        let Event::InteractionCreate(interaction) = event else {
            return Ok(false);
        };

        Ok(matches!(interaction.kind, InteractionKind::Button { .. }))
    }
}

/// Passes only select-menu interactions
pub struct SelectMenuOnly;

#[async_trait]
impl Check<Event> for SelectMenuOnly {
    async fn check(&self, event: &Event) -> Result<bool> {
        let Event::InteractionCreate(interaction) = event else {
            return Ok(false);
        };

        Ok(matches!(
            interaction.kind,
            InteractionKind::SelectMenu { .. }
        ))
    }
}

/// Passes only modal submissions
pub struct ModalSubmitOnly;

#[async_trait]
impl Check<Event> for ModalSubmitOnly {
    async fn check(&self, event: &Event) -> Result<bool> {
        let Event::InteractionCreate(interaction) = event else {
            return Ok(false);
        };

        Ok(matches!(
            interaction.kind,
            InteractionKind::ModalSubmit { .. }
        ))
    }
}

/// Passes only interactions whose custom id belongs to one definition
///
/// Lets many definitions coexist on one generic component listener: each
/// handler fires only for identifiers it owns. Only the prefix is tested;
/// payload validation stays with the handler's own `unpack`.
pub struct CustomIdCheck {
    prefix: String,
}

impl CustomIdCheck {
    pub fn new<T>(definition: &CustomId<T>) -> Self
    where
        T: Serialize + DeserializeOwned,
    {
        Self {
            prefix: definition.prefix().to_string(),
        }
    }
}

#[async_trait]
impl Check<Event> for CustomIdCheck {
    async fn check(&self, event: &Event) -> Result<bool> {
        let Event::InteractionCreate(interaction) = event else {
            return Ok(false);
        };

        let Some(raw) = interaction.custom_id() else {
            return Ok(false);
        };

        Ok(matches_prefix(raw, &self.prefix))
    }
}
