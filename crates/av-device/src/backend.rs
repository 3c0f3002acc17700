//! The backend and session traits consumed by the engine.

use std::collections::BTreeMap;

use crate::credential::{Credential, CredentialId, DerivedKey, OneTimeCode};
use crate::error::DeviceResult;
use crate::token::{DeviceScan, TokenId, TopologyFingerprint};

/// Discovers attached devices and opens credential sessions on them.
///
/// Calls block until the device answers; bounding them with a timeout is the
/// implementation's responsibility.
pub trait DeviceBackend: std::fmt::Debug {
    /// Cheap poll of the attached-device fingerprint.
    fn fingerprint(&self) -> DeviceResult<TopologyFingerprint>;

    /// Enumerate every attached device.
    fn enumerate(&self) -> DeviceResult<DeviceScan>;

    /// Open an OATH credential session on the given device.
    fn open_session(&self, token: TokenId) -> DeviceResult<Box<dyn CredentialSession>>;
}

/// An open OATH credential session on one device.
pub trait CredentialSession: std::fmt::Debug {
    /// Whether the session requires a password before credentials can be used.
    fn is_locked(&self) -> bool;

    /// Derive the unlock key for a password.
    fn derive_key(&self, password: &str) -> DerivedKey;

    /// Unlock the session with a derived key.
    ///
    /// Fails with [`crate::DeviceError::WrongPassword`] if the key is rejected.
    fn validate(&mut self, key: &DerivedKey) -> DeviceResult<()>;

    /// List the credentials stored on the device.
    fn list_credentials(&mut self) -> DeviceResult<BTreeMap<CredentialId, Credential>>;

    /// Calculate a one-time code, waiting for a touch if the credential needs one.
    ///
    /// Fails with [`crate::DeviceError::TouchTimeout`] if the touch never came.
    fn calculate_code(&mut self, credential: &Credential) -> DeviceResult<OneTimeCode>;
}
