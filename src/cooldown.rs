//! # Cooldown Buckets
//!
//! Scoped rate limiting for command usage: a strategy maps an invocation to a
//! bucket identity, a pluggable storage holds bucket state, and the manager
//! decides whether the invocation is throttled under a quota-per-window
//! contract. Uses DashMap for thread-safe concurrent access in the in-process
//! storage.
//!
//! The in-process storage is best-effort under concurrency: two overlapping
//! invocations on the same bucket can both read "not on cooldown" before
//! either increment lands, permitting one extra use beyond quota. A shared
//! storage that needs exact enforcement must make find + record effectively
//! atomic per bucket identity.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Quota-aware gating (a time-only gate denies the first use of a fresh bucket)
//! - 1.0.0: Initial release with strategy-scoped buckets and pluggable storage

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;
use uuid::Uuid;

/// Rule mapping an invocation to a bucket identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStrategy {
    /// One bucket per command per guild
    Guild,
    /// One bucket per command per user per guild
    Member,
    /// One bucket per command per channel
    Channel,
    /// One bucket per command per user, across guilds
    User,
}

impl CooldownStrategy {
    /// True if `bucket` is the bucket for `scope` under this strategy
    ///
    /// Only the strategy's identity fields participate; the rest of the
    /// bucket's scope fields are ignored for matching.
    pub fn scope_matches(self, bucket: &CooldownBucket, scope: &BucketScope) -> bool {
        if bucket.command_id != scope.command_id {
            return false;
        }

        match self {
            CooldownStrategy::Guild => bucket.guild_id == scope.guild_id,
            CooldownStrategy::Channel => bucket.channel_id == scope.channel_id,
            CooldownStrategy::User => bucket.user_id == scope.user_id,
            CooldownStrategy::Member => {
                bucket.guild_id == scope.guild_id && bucket.user_id == scope.user_id
            }
        }
    }
}

/// Scope keys extracted from an invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketScope {
    pub guild_id: Option<String>,
    pub user_id: Option<String>,
    pub channel_id: Option<String>,
    pub command_id: Option<String>,
}

/// Rate-limit state for one scope
///
/// Scope fields never change after creation; only `current_use_count` and
/// `expires_at` mutate.
#[derive(Debug, Clone)]
pub struct CooldownBucket {
    pub id: String,
    pub guild_id: Option<String>,
    pub user_id: Option<String>,
    pub channel_id: Option<String>,
    pub command_id: Option<String>,
    pub current_use_count: u32,
    pub expires_at: DateTime<Utc>,
}

/// Pluggable bucket store
///
/// Swappable for a networked/shared implementation without touching
/// [`CooldownManager`] logic.
#[async_trait]
pub trait BucketStorage: Send + Sync {
    /// Return the bucket matching `scope` under `strategy`, creating a fresh
    /// one (zero uses, expiry one window from now) if none exists
    async fn find_bucket(
        &self,
        strategy: CooldownStrategy,
        scope: &BucketScope,
    ) -> Result<CooldownBucket>;

    /// Record one use: reset the window first if it has elapsed, then
    /// increment the use count
    async fn record_use(&self, bucket_id: &str) -> Result<()>;

    /// Delete a bucket, e.g. to reclaim an expired one immediately
    async fn remove_bucket(&self, bucket_id: &str) -> Result<()>;
}

/// In-process [`BucketStorage`] backed by a DashMap
///
/// Lookup scans linearly for a matching scope, which is fine at the
/// cardinalities a single process sees. Buckets are never reaped unless a
/// caller removes them explicitly.
pub struct MemoryBucketStorage {
    window: chrono::Duration,
    buckets: DashMap<String, CooldownBucket>,
}

impl MemoryBucketStorage {
    /// # Panics
    ///
    /// Panics if `timeout` is zero: a zero-length window would expire every
    /// bucket the instant it is created.
    pub fn new(timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "timeout must be positive");

        // Timeouts beyond chrono's representable range saturate to max
        let window = chrono::Duration::from_std(timeout).unwrap_or(chrono::Duration::MAX);

        Self {
            window,
            buckets: DashMap::new(),
        }
    }

    /// Number of live buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn next_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
impl BucketStorage for MemoryBucketStorage {
    async fn find_bucket(
        &self,
        strategy: CooldownStrategy,
        scope: &BucketScope,
    ) -> Result<CooldownBucket> {
        if let Some(existing) = self
            .buckets
            .iter()
            .find(|entry| strategy.scope_matches(entry.value(), scope))
        {
            return Ok(existing.value().clone());
        }

        let bucket = CooldownBucket {
            id: Uuid::new_v4().to_string(),
            guild_id: scope.guild_id.clone(),
            user_id: scope.user_id.clone(),
            channel_id: scope.channel_id.clone(),
            command_id: scope.command_id.clone(),
            current_use_count: 0,
            expires_at: self.next_expiry(Utc::now()),
        };

        debug!("Created cooldown bucket {} for scope {scope:?}", bucket.id);
        self.buckets.insert(bucket.id.clone(), bucket.clone());
        Ok(bucket)
    }

    async fn record_use(&self, bucket_id: &str) -> Result<()> {
        if let Some(mut bucket) = self.buckets.get_mut(bucket_id) {
            let now = Utc::now();

            if now >= bucket.expires_at {
                bucket.current_use_count = 0;
                bucket.expires_at = self.next_expiry(now);
            }

            bucket.current_use_count += 1;
        }

        Ok(())
    }

    async fn remove_bucket(&self, bucket_id: &str) -> Result<()> {
        self.buckets.remove(bucket_id);
        Ok(())
    }
}

/// Outcome of a cooldown query: the matched bucket and whether it throttles
#[derive(Debug, Clone)]
pub struct CooldownStatus {
    pub bucket: CooldownBucket,
    pub on_cooldown: bool,
}

/// Pairs a scoping strategy with a bucket store and applies the quota rule
///
/// A bucket throttles if and only if its window is still open and its quota
/// is exhausted. An elapsed window means the next use is allowed; the reset
/// happens when that use is recorded.
pub struct CooldownManager {
    strategy: CooldownStrategy,
    max_use_count: u32,
    storage: Arc<dyn BucketStorage>,
}

impl CooldownManager {
    /// # Panics
    ///
    /// Panics if `max_use_count` is zero: a zero quota would throttle every
    /// invocation including the first.
    pub fn new(
        strategy: CooldownStrategy,
        max_use_count: u32,
        storage: Arc<dyn BucketStorage>,
    ) -> Self {
        assert!(max_use_count > 0, "max_use_count must be positive");

        Self {
            strategy,
            max_use_count,
            storage,
        }
    }

    pub fn strategy(&self) -> CooldownStrategy {
        self.strategy
    }

    pub fn max_use_count(&self) -> u32 {
        self.max_use_count
    }

    pub fn storage(&self) -> &Arc<dyn BucketStorage> {
        &self.storage
    }

    /// Look up (or lazily create) the bucket for `scope` and report whether
    /// it is currently throttling
    pub async fn check_on_cooldown(&self, scope: &BucketScope) -> Result<CooldownStatus> {
        let bucket = self.storage.find_bucket(self.strategy, scope).await?;
        let now = Utc::now();
        let on_cooldown = now < bucket.expires_at && bucket.current_use_count >= self.max_use_count;

        Ok(CooldownStatus { bucket, on_cooldown })
    }

    /// Record one allowed use against the bucket for `scope`
    pub async fn record_use(&self, bucket_id: &str) -> Result<()> {
        self.storage.record_use(bucket_id).await
    }
}
