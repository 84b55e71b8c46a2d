//! Invocation context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with nested-option flattening

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::interaction::{CommandOption, Interaction, InteractionKind, Member, OptionValue};

/// Per-invocation context handed to checks and handlers
///
/// Built once per interaction and discarded after dispatch completes; never
/// persisted, never reused. The `data` bag starts empty and is populated by
/// the owning command's data hook before any handler runs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub interaction: Arc<Interaction>,
    /// Resolved guild member, when the interaction happened inside a guild
    pub member: Option<Member>,
    pub guild_id: Option<String>,
    /// Flattened leaf options as a name -> value map
    pub options: HashMap<String, OptionValue>,
    /// Auxiliary data supplied by the command's data hook
    pub data: HashMap<String, Value>,
}

impl CommandContext {
    /// Build a context from a normalized interaction
    ///
    /// Chat-input interactions get their option tree flattened; every other
    /// kind gets an empty option map.
    pub fn from_interaction(interaction: Arc<Interaction>) -> Self {
        let member = interaction.member.clone();
        let guild_id = interaction.guild_id.clone();
        let options = match &interaction.kind {
            InteractionKind::ChatInput { options } => flatten_options(options),
            _ => HashMap::new(),
        };

        Self {
            interaction,
            member,
            guild_id,
            options,
            data: HashMap::new(),
        }
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.options.get(name) {
            Some(OptionValue::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match self.options.get(name) {
            Some(OptionValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.options.get(name) {
            Some(OptionValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_boolean(&self, name: &str) -> Option<bool> {
        match self.options.get(name) {
            Some(OptionValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_user(&self, name: &str) -> Option<&str> {
        match self.options.get(name) {
            Some(OptionValue::User(id)) => Some(id),
            _ => None,
        }
    }

    pub fn get_channel(&self, name: &str) -> Option<&str> {
        match self.options.get(name) {
            Some(OptionValue::Channel(id)) => Some(id),
            _ => None,
        }
    }

    pub fn get_role(&self, name: &str) -> Option<&str> {
        match self.options.get(name) {
            Some(OptionValue::Role(id)) => Some(id),
            _ => None,
        }
    }
}

/// Flatten an option tree into a leaf name -> value map
///
/// The tree is at most two wrapper levels deep and a client only ever fills
/// in the single selected sub-command path, so descent follows the first
/// option that itself carries nested options. Sub-command and
/// sub-command-group markers never enter the map.
pub fn flatten_options(options: &[CommandOption]) -> HashMap<String, OptionValue> {
    let mut leaves = Vec::new();
    accumulate_leaves(options, &mut leaves);

    leaves
        .into_iter()
        .filter(|option| !option.is_group_marker())
        .map(|option| (option.name.clone(), option.value.clone()))
        .collect()
}

fn accumulate_leaves<'a>(options: &'a [CommandOption], leaves: &mut Vec<&'a CommandOption>) {
    for option in options {
        if !option.options.is_empty() {
            // the single active branch; siblings at this level are never filled in
            return accumulate_leaves(&option.options, leaves);
        }

        leaves.push(option);
    }
}
