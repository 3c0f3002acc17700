//! Device identifiers and discovery results.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies an attached authentication device by its serial number.
///
/// Unique among the devices attached at one time, but not across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Opaque value that changes whenever the set of attached devices changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopologyFingerprint(pub u64);

/// Summary of one attached device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// The device's serial number.
    pub token: TokenId,
    /// Human-readable model name.
    pub name: String,
}

/// The result of enumerating attached devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceScan {
    /// Every currently attached device.
    pub devices: Vec<DeviceInfo>,
    /// Fingerprint of the attached set at enumeration time.
    pub fingerprint: TopologyFingerprint,
}

impl DeviceScan {
    /// Serial numbers of the attached devices, in enumeration order.
    pub fn tokens(&self) -> Vec<TokenId> {
        self.devices.iter().map(|d| d.token).collect()
    }
}
