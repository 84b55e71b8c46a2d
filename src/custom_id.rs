//! # Structured Component Identifiers
//!
//! Component custom ids carry a fixed routing prefix plus a JSON payload
//! validated against a typed schema, so stateless-looking buttons and menus
//! can round-trip structured data under the platform's 100 character ceiling.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with typed pack/unpack and prefix routing

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Hard platform ceiling on a component identifier
pub const CUSTOM_ID_MAX_LENGTH: usize = 100;

/// Separator between prefix and payload; never allowed inside a prefix
pub const CUSTOM_ID_SEPARATOR: char = ':';

#[derive(Debug, Error)]
pub enum CustomIdError {
    /// The prefix handed to the constructor contains the separator
    #[error("custom id prefix {0:?} must not contain ':'")]
    InvalidPrefix(String),
    /// The payload could not be serialized at all
    #[error("failed to encode custom id payload: {0}")]
    Encode(#[source] serde_json::Error),
    /// The packed form exceeds the platform ceiling
    #[error("packed custom id is {0} characters, over the 100 character limit")]
    TooLong(usize),
    /// The identifier belongs to a different definition; callers routing
    /// among several definitions try the next one on this
    #[error("custom id does not start with prefix {0:?}")]
    PrefixMismatch(String),
    /// The payload does not satisfy the schema contract
    #[error("custom id payload does not match contract: {0}")]
    Schema(#[source] serde_json::Error),
}

/// True if `raw` carries `prefix` followed by the separator
pub fn matches_prefix(raw: &str, prefix: &str) -> bool {
    raw.strip_prefix(prefix)
        .map_or(false, |rest| rest.starts_with(CUSTOM_ID_SEPARATOR))
}

/// A custom-id definition: fixed prefix plus payload schema `T`
///
/// Packing and unpacking are inverse for any payload the schema accepts.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use switchboard::custom_id::CustomId;
///
/// #[derive(Serialize, Deserialize)]
/// struct Page { n: u32 }
///
/// let pager: CustomId<Page> = CustomId::new("pager").unwrap();
/// let raw = pager.pack(&Page { n: 3 }).unwrap();
/// assert_eq!(pager.unpack(&raw).unwrap().n, 3);
/// ```
pub struct CustomId<T> {
    prefix: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for CustomId<T> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CustomId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomId")
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl<T> CustomId<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a definition, rejecting a prefix that contains the separator
    pub fn new(prefix: impl Into<String>) -> Result<Self, CustomIdError> {
        let prefix = prefix.into();

        if prefix.contains(CUSTOM_ID_SEPARATOR) {
            return Err(CustomIdError::InvalidPrefix(prefix));
        }

        Ok(Self {
            prefix,
            _payload: PhantomData,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Serialize `payload` into `prefix:json`, enforcing the length ceiling
    pub fn pack(&self, payload: &T) -> Result<String, CustomIdError> {
        let json = serde_json::to_string(payload).map_err(CustomIdError::Encode)?;
        let packed = format!("{}{}{}", self.prefix, CUSTOM_ID_SEPARATOR, json);
        let length = packed.chars().count();

        if length > CUSTOM_ID_MAX_LENGTH {
            return Err(CustomIdError::TooLong(length));
        }

        Ok(packed)
    }

    /// Verify the prefix, then deserialize and validate the payload
    ///
    /// Prefix failure and schema failure are distinct: the first means the
    /// identifier is owned by some other definition, the second that the
    /// identifier is ours but its payload is malformed.
    pub fn unpack(&self, raw: &str) -> Result<T, CustomIdError> {
        let payload = raw
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix(CUSTOM_ID_SEPARATOR))
            .ok_or_else(|| CustomIdError::PrefixMismatch(self.prefix.clone()))?;

        serde_json::from_str(payload).map_err(CustomIdError::Schema)
    }

    /// Prefix membership test, without touching the payload
    ///
    /// This is what lets many definitions coexist on one generic component
    /// listener: each handler fires only for identifiers it owns.
    pub fn matches(&self, raw: &str) -> bool {
        matches_prefix(raw, &self.prefix)
    }
}
