//! # Check System
//!
//! Asynchronous gating predicates composed into a short-circuiting pipeline.
//! The same engine is reused at three scopes: command-level and
//! handler-level checks evaluate a [`CommandContext`], event-handler checks
//! evaluate a raw [`Event`]; the engine itself is subject-agnostic.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add stock component-kind and custom-id event checks
//! - 1.0.0: Initial implementation with subject-agnostic pipeline

pub mod cooldown;
pub mod default;
pub mod event;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::commands::context::CommandContext;
use crate::event::Event;

pub use cooldown::{CooldownCheck, CooldownNotifier};
pub use default::{GuildOnly, HasPermissions};
pub use event::{ButtonOnly, CustomIdCheck, ModalSubmitOnly, SelectMenuOnly};

/// An asynchronous gating predicate over a subject of type `S`
///
/// `Ok(false)` means the policy denied the subject: evaluation stops and the
/// pipeline reports denial, silently. `Err` means the check itself is broken;
/// the error propagates uncaught to the pipeline's caller — the two must
/// never be conflated.
#[async_trait]
pub trait Check<S: Sync>: Send + Sync {
    async fn check(&self, subject: &S) -> Result<bool>;
}

/// A check evaluated against a built invocation context
pub type CommandCheck = dyn Check<CommandContext>;

/// A check evaluated against a raw platform event
pub type EventCheck = dyn Check<Event>;

/// Evaluate checks strictly in registration order, one at a time
///
/// Ordering is part of the contract: a later check may assume an earlier one
/// already validated a precondition. The first `Ok(false)` short-circuits the
/// pipeline; unevaluated checks observe no side effects. Errors are neither
/// logged nor suppressed here.
pub async fn run_checks<S: Sync>(subject: &S, checks: &[Arc<dyn Check<S>>]) -> Result<bool> {
    for check in checks {
        if !check.check(subject).await? {
            return Ok(false);
        }
    }

    Ok(true)
}
