//! Stock command-level checks

use anyhow::Result;
use async_trait::async_trait;

use super::Check;
use crate::commands::context::CommandContext;
use crate::interaction::Permissions;

/// Denies invocations that did not happen inside a guild
///
/// Register this ahead of checks that assume a resolved member.
pub struct GuildOnly;

#[async_trait]
impl Check<CommandContext> for GuildOnly {
    async fn check(&self, ctx: &CommandContext) -> Result<bool> {
        Ok(ctx.guild_id.is_some() && ctx.member.is_some())
    }
}

/// Denies invocations whose member lacks all of the required permissions
pub struct HasPermissions {
    required: Permissions,
}

impl HasPermissions {
    pub fn new(required: Permissions) -> Self {
        Self { required }
    }
}

#[async_trait]
impl Check<CommandContext> for HasPermissions {
    async fn check(&self, ctx: &CommandContext) -> Result<bool> {
        let Some(member) = &ctx.member else {
            return Ok(false);
        };

        Ok(member.permissions.contains(self.required))
    }
}
