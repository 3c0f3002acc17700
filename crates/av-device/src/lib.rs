//! Authentication device sessions for Authventure.
//!
//! This crate defines the contract the game engine uses to talk to attached
//! authentication devices: discovering which devices are plugged in, opening
//! an OATH credential session on one of them, unlocking it with a password,
//! listing its credentials and calculating one-time codes.
//!
//! The physical transport is not part of this crate. [`SimulatedBackend`]
//! implements the contract entirely in memory and can be loaded from a JSON
//! topology file, which is how the game is played and tested without
//! hardware.

/// The backend and session traits consumed by the engine.
pub mod backend;
/// Credential, code and key types.
pub mod credential;
/// Error types for device communication.
pub mod error;
/// OATH primitives: HMAC, password key derivation and code truncation.
pub mod oath;
/// In-memory device backend.
pub mod simulated;
/// Device identifiers and discovery results.
pub mod token;
/// JSON topology files describing simulated devices.
pub mod topology;

pub use backend::{CredentialSession, DeviceBackend};
pub use credential::{Credential, CredentialId, DerivedKey, OathKind, OneTimeCode};
pub use error::{DeviceError, DeviceResult};
pub use simulated::{Clock, SimulatedBackend, SimulatedCredential, SimulatedDevice, TouchResponse};
pub use token::{DeviceInfo, DeviceScan, TokenId, TopologyFingerprint};
pub use topology::TopologyFile;
