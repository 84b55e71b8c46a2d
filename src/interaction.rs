//! Normalized interaction model
//!
//! The platform client delivers interactions in whatever shape its transport
//! uses; the dispatch core only ever sees this normalized record. Hosts map
//! their gateway payloads into [`Interaction`] once, at the edge.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with command option tree and component kinds

use serde::{Deserialize, Serialize};

/// A user as resolved by the platform layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Guild permission bitset
///
/// Bit positions follow the platform's permission flags; only the flags the
/// stock checks need are named here. Hosts can pass raw bits for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub u64);

impl Permissions {
    pub const CREATE_INSTANT_INVITE: Permissions = Permissions(1 << 0);
    pub const KICK_MEMBERS: Permissions = Permissions(1 << 1);
    pub const BAN_MEMBERS: Permissions = Permissions(1 << 2);
    pub const ADMINISTRATOR: Permissions = Permissions(1 << 3);
    pub const MANAGE_CHANNELS: Permissions = Permissions(1 << 4);
    pub const MANAGE_GUILD: Permissions = Permissions(1 << 5);
    pub const MANAGE_MESSAGES: Permissions = Permissions(1 << 13);

    /// True if every bit of `other` is set in `self`
    pub fn contains(self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: Permissions) -> Permissions {
        Permissions(self.0 | other.0)
    }
}

/// A guild member: the invoking user plus their resolved guild permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    pub permissions: Permissions,
}

/// A single node in a command's option tree
///
/// Leaf options carry a primitive [`OptionValue`]; sub-command and
/// sub-command-group wrappers carry a grouping marker value and children.
/// The tree is at most two wrapper levels deep: root -> group -> sub -> leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    /// A leaf option carrying a primitive value
    pub fn leaf(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
            options: Vec::new(),
        }
    }

    /// A sub-command wrapper holding leaf options
    pub fn subcommand(name: impl Into<String>, options: Vec<CommandOption>) -> Self {
        Self {
            name: name.into(),
            value: OptionValue::SubCommand,
            options,
        }
    }

    /// A sub-command-group wrapper holding sub-commands
    pub fn subcommand_group(name: impl Into<String>, options: Vec<CommandOption>) -> Self {
        Self {
            name: name.into(),
            value: OptionValue::SubCommandGroup,
            options,
        }
    }

    /// True for sub-command / sub-command-group markers (never argument leaves)
    pub fn is_group_marker(&self) -> bool {
        matches!(
            self.value,
            OptionValue::SubCommand | OptionValue::SubCommandGroup
        )
    }
}

/// Typed value of a command option
///
/// Entity-valued options (user/channel/role/mentionable/attachment) carry the
/// entity id; resolving the id to a full object is the platform layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    SubCommand,
    SubCommandGroup,
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(String),
    Channel(String),
    Role(String),
    Mentionable(String),
    Attachment(String),
}

/// Shape of an incoming interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Slash command carrying a structured option tree
    ChatInput { options: Vec<CommandOption> },
    /// User or message context-menu command (no option tree)
    ContextMenu,
    /// Button press on a message component
    Button { custom_id: String },
    /// Select-menu choice on a message component
    SelectMenu {
        custom_id: String,
        values: Vec<String>,
    },
    /// Modal form submission
    ModalSubmit { custom_id: String },
}

/// One incoming request from the chat platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    /// Platform-assigned id of the invoked command, if this is a command
    pub command_id: Option<String>,
    /// Registered name of the invoked command, if this is a command
    pub command_name: Option<String>,
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub user: User,
    /// Present when the interaction happened inside a guild
    pub member: Option<Member>,
    pub kind: InteractionKind,
}

impl Interaction {
    /// True for command invocations (chat-input or context-menu)
    pub fn is_command(&self) -> bool {
        matches!(
            self.kind,
            InteractionKind::ChatInput { .. } | InteractionKind::ContextMenu
        )
    }

    /// Custom id carried by component/modal kinds, if any
    pub fn custom_id(&self) -> Option<&str> {
        match &self.kind {
            InteractionKind::Button { custom_id }
            | InteractionKind::SelectMenu { custom_id, .. }
            | InteractionKind::ModalSubmit { custom_id } => Some(custom_id),
            _ => None,
        }
    }

    /// Selected sub-command path as `(group, name)`
    ///
    /// A client only ever fills in the single selected path, so the first
    /// option at each level is the active branch. Returns `(None, None)` for
    /// interactions without an option tree or without sub-commands.
    pub fn subcommand_path(&self) -> (Option<&str>, Option<&str>) {
        let InteractionKind::ChatInput { options } = &self.kind else {
            return (None, None);
        };

        match options.first() {
            Some(option) if option.value == OptionValue::SubCommandGroup => {
                let name = option
                    .options
                    .first()
                    .filter(|inner| inner.value == OptionValue::SubCommand)
                    .map(|inner| inner.name.as_str());
                (Some(option.name.as_str()), name)
            }
            Some(option) if option.value == OptionValue::SubCommand => {
                (None, Some(option.name.as_str()))
            }
            _ => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "tester".to_string(),
        }
    }

    fn chat_input(options: Vec<CommandOption>) -> Interaction {
        Interaction {
            id: "i1".to_string(),
            command_id: Some("c1".to_string()),
            command_name: Some("config".to_string()),
            guild_id: Some("g1".to_string()),
            channel_id: "ch1".to_string(),
            user: user(),
            member: None,
            kind: InteractionKind::ChatInput { options },
        }
    }

    #[test]
    fn test_permissions_contains() {
        let perms = Permissions::KICK_MEMBERS.union(Permissions::BAN_MEMBERS);
        assert!(perms.contains(Permissions::KICK_MEMBERS));
        assert!(perms.contains(Permissions::BAN_MEMBERS));
        assert!(!perms.contains(Permissions::ADMINISTRATOR));
        assert!(perms.contains(Permissions::default()));
    }

    #[test]
    fn test_subcommand_path_bare() {
        let interaction = chat_input(vec![CommandOption::leaf(
            "query",
            OptionValue::String("x".to_string()),
        )]);
        assert_eq!(interaction.subcommand_path(), (None, None));
    }

    #[test]
    fn test_subcommand_path_without_group() {
        let interaction = chat_input(vec![CommandOption::subcommand("set", vec![])]);
        assert_eq!(interaction.subcommand_path(), (None, Some("set")));
    }

    #[test]
    fn test_subcommand_path_with_group() {
        let interaction = chat_input(vec![CommandOption::subcommand_group(
            "cfg",
            vec![CommandOption::subcommand("set", vec![])],
        )]);
        assert_eq!(interaction.subcommand_path(), (Some("cfg"), Some("set")));
    }

    #[test]
    fn test_custom_id_only_on_component_kinds() {
        let mut interaction = chat_input(vec![]);
        assert_eq!(interaction.custom_id(), None);

        interaction.kind = InteractionKind::Button {
            custom_id: "pager:1".to_string(),
        };
        assert_eq!(interaction.custom_id(), Some("pager:1"));
        assert!(!interaction.is_command());
    }
}
