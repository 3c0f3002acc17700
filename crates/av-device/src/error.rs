//! Error types for device communication.

use thiserror::Error;

use crate::token::TokenId;

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors that can occur while talking to an authentication device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device is not (or no longer) attached.
    #[error("device {0} is not connected")]
    NotConnected(TokenId),

    /// The password-derived key was rejected.
    #[error("wrong password")]
    WrongPassword,

    /// The user did not confirm the operation by touching the device in time.
    #[error("touch confirmation timed out")]
    TouchTimeout,

    /// The session must be unlocked before credentials can be used.
    #[error("credential session is locked")]
    Locked,

    /// The credential does not exist on the device.
    #[error("unknown credential: {0}")]
    UnknownCredential(String),

    /// Any other transport or protocol failure.
    #[error("device communication failed: {0}")]
    Communication(String),

    /// A device or credential is configured in a way that cannot be used.
    #[error("invalid device configuration: {0}")]
    InvalidConfig(String),
}

impl DeviceError {
    /// Whether the error is a rejected password or an unconfirmed touch,
    /// as opposed to a device that went away or misbehaved.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::WrongPassword | Self::TouchTimeout)
    }
}
