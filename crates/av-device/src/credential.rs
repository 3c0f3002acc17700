//! Credential, code and key types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a credential stored on a device.
///
/// Stored as raw bytes; matching against user input is an exact byte match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialId(pub Vec<u8>);

impl From<&str> for CredentialId {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// The OATH algorithm family of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OathKind {
    /// Time-based codes.
    #[default]
    Totp,
    /// Counter-based codes.
    Hotp,
}

/// A credential as listed by a credential session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Identifier of the credential.
    pub id: CredentialId,
    /// Time- or counter-based.
    pub kind: OathKind,
    /// Number of digits in calculated codes (6 or 8).
    pub digits: u8,
    /// Time step in seconds (TOTP only).
    pub period: u32,
    /// Whether calculating a code requires touching the device.
    pub touch_required: bool,
}

/// A calculated one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    /// The decimal digits of the code.
    pub value: String,
    /// Unix timestamp from which the code is valid.
    pub valid_from: i64,
    /// Unix timestamp at which the code expires; `None` for counter-based codes.
    pub valid_to: Option<i64>,
}

/// Key derived from a password, used to unlock a credential session.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(pub [u8; 16]);

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}
