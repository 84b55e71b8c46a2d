//! Cooldown as a command-level check
//!
//! Checks are meant to be side-effect free; this one is the sanctioned
//! exception, recording the use as part of a passing evaluation.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use super::Check;
use crate::commands::context::CommandContext;
use crate::cooldown::{BucketScope, CooldownBucket, CooldownManager};

/// Invoked when a throttled invocation is denied, so the host can tell the
/// user; dispatch itself stays silent on denial
#[async_trait]
pub trait CooldownNotifier: Send + Sync {
    async fn notify(&self, ctx: &CommandContext, bucket: &CooldownBucket) -> Result<()>;
}

/// Command check gating invocations through a [`CooldownManager`]
pub struct CooldownCheck {
    manager: Arc<CooldownManager>,
    notifier: Option<Arc<dyn CooldownNotifier>>,
}

impl CooldownCheck {
    pub fn new(manager: Arc<CooldownManager>) -> Self {
        Self {
            manager,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn CooldownNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Scope keys for the invocation; the strategy picks which ones matter
    fn scope_from(ctx: &CommandContext) -> BucketScope {
        BucketScope {
            guild_id: ctx.guild_id.clone(),
            user_id: Some(ctx.interaction.user.id.clone()),
            channel_id: Some(ctx.interaction.channel_id.clone()),
            command_id: ctx.interaction.command_id.clone(),
        }
    }
}

#[async_trait]
impl Check<CommandContext> for CooldownCheck {
    async fn check(&self, ctx: &CommandContext) -> Result<bool> {
        let scope = Self::scope_from(ctx);
        let status = self.manager.check_on_cooldown(&scope).await?;

        if status.on_cooldown {
            debug!(
                "Cooldown denied bucket {} (uses {}/{})",
                status.bucket.id,
                status.bucket.current_use_count,
                self.manager.max_use_count()
            );

            if let Some(notifier) = &self.notifier {
                notifier.notify(ctx, &status.bucket).await?;
            }

            return Ok(false);
        }

        self.manager.record_use(&status.bucket.id).await?;
        Ok(true)
    }
}
