//! Error types for the fiction engine.

use av_device::DeviceError;
use thiserror::Error;

/// Result type for fiction operations.
pub type FictionResult<T> = Result<T, FictionError>;

/// Errors that escape a command.
///
/// Mistyped commands, wrong passwords and declined confirmations are not
/// errors; they are narrated in character. Only failures talking to the
/// device end up here.
#[derive(Debug, Error)]
pub enum FictionError {
    /// The device could not be reached.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// The guardian was approached without a token in the player's pocket.
    #[error("no token is held")]
    TokenNotHeld,
}
