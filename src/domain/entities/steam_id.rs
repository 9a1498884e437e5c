//! Steam account identifier value objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::EngineError;

/// Offset between the 64-bit community ID and the 32-bit account ID.
pub const STEAM64_BASE: u64 = 76_561_197_960_265_728;

/// Canonical 64-bit community identifier, used by first-party APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId64(u64);

impl SteamId64 {
    /// Wraps a raw 64-bit ID.
    ///
    /// # Errors
    /// Returns `EngineError::Format` if the value lies below the community
    /// ID base or past the 32-bit account range.
    pub fn new(value: u64) -> Result<Self, EngineError> {
        match value.checked_sub(STEAM64_BASE) {
            Some(account) if u32::try_from(account).is_ok() => Ok(Self(value)),
            _ => Err(EngineError::format(format!(
                "{value} is not a 64-bit community ID"
            ))),
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Converts to the legacy 32-bit account ID.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_steam32(self) -> SteamId32 {
        // `new` guarantees the difference fits in 32 bits.
        SteamId32((self.0 - STEAM64_BASE) as u32)
    }
}

impl FromStr for SteamId64 {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|e| EngineError::format(format!("invalid 64-bit ID {s:?}: {e}")))?;
        Self::new(value)
    }
}

impl fmt::Display for SteamId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Legacy 32-bit account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId32(u32);

impl SteamId32 {
    /// Wraps a raw account ID.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Builds the account ID from a `STEAM_X:<universe_bit>:<account>` triple.
    ///
    /// # Errors
    /// Returns `EngineError::Format` if the universe bit is not 0 or 1, or
    /// the result overflows the 32-bit range.
    pub fn from_legacy_parts(universe_bit: u32, account: u32) -> Result<Self, EngineError> {
        if universe_bit > 1 {
            return Err(EngineError::format(format!(
                "universe bit must be 0 or 1, got {universe_bit}"
            )));
        }
        account
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(universe_bit))
            .map(Self)
            .ok_or_else(|| EngineError::format(format!("account {account} out of range")))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Converts to the canonical 64-bit community ID.
    #[must_use]
    pub const fn to_steam64(self) -> SteamId64 {
        SteamId64(STEAM64_BASE + self.0 as u64)
    }
}

impl fmt::Display for SteamId32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a decimal 64-bit ID and converts it to the 32-bit form.
///
/// # Errors
/// Returns `EngineError::Format` if the input is not a valid 64-bit ID.
pub fn steam64_to_steam32(id64: &str) -> Result<SteamId32, EngineError> {
    id64.parse::<SteamId64>().map(SteamId64::to_steam32)
}

/// The three representations of one Steam account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    /// Vanity name, when the identity was resolved from one.
    pub vanity: Option<String>,
    /// Canonical 64-bit ID.
    pub steam64: SteamId64,
    /// Legacy 32-bit ID.
    pub steam32: SteamId32,
}

impl ResolvedIdentity {
    /// Builds the identity from a 64-bit ID.
    #[must_use]
    pub fn from_steam64(vanity: Option<String>, steam64: SteamId64) -> Self {
        Self {
            vanity,
            steam64,
            steam32: steam64.to_steam32(),
        }
    }

    /// Builds the identity from a 32-bit ID.
    #[must_use]
    pub fn from_steam32(vanity: Option<String>, steam32: SteamId32) -> Self {
        Self {
            vanity,
            steam64: steam32.to_steam64(),
            steam32,
        }
    }
}
