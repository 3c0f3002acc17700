//! JSON topology files describing simulated devices.
//!
//! ```text
//! {
//!   "devices": [
//!     {
//!       "serial": 1234,
//!       "name": "YubiKey 5 NFC",
//!       "password": "hunter2",
//!       "credentials": [
//!         { "name": "example:alice", "secret": "3132333435", "digits": 8 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::credential::OathKind;
use crate::error::{DeviceError, DeviceResult};
use crate::simulated::{SimulatedBackend, SimulatedCredential, SimulatedDevice, TouchResponse};
use crate::token::TokenId;

/// Top-level topology document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyFile {
    /// Devices attached at start.
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

/// One device in a topology document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Serial number.
    pub serial: TokenId,
    /// Model name.
    #[serde(default = "default_device_name")]
    pub name: String,
    /// Unlock password.
    #[serde(default)]
    pub password: Option<String>,
    /// Touch behaviour.
    #[serde(default)]
    pub touch: TouchResponse,
    /// Stored credentials.
    #[serde(default)]
    pub credentials: Vec<CredentialEntry>,
}

/// One credential in a topology document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialEntry {
    /// Credential name.
    pub name: String,
    /// Hex-encoded secret.
    pub secret: String,
    /// Time- or counter-based.
    #[serde(default)]
    pub kind: OathKind,
    /// Code length.
    #[serde(default = "default_digits")]
    pub digits: u8,
    /// TOTP time step.
    #[serde(default = "default_period")]
    pub period: u32,
    /// Initial HOTP counter.
    #[serde(default)]
    pub counter: u64,
    /// Whether a touch is required.
    #[serde(default)]
    pub touch: bool,
}

fn default_device_name() -> String {
    "YubiKey".to_string()
}

fn default_digits() -> u8 {
    6
}

fn default_period() -> u32 {
    30
}

impl TopologyFile {
    /// Parse a topology document.
    pub fn from_json(json: &str) -> DeviceResult<Self> {
        serde_json::from_str(json).map_err(|e| DeviceError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a topology file.
    pub fn load(path: &Path) -> DeviceResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DeviceError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Validate the document and convert it into simulated devices.
    pub fn into_devices(self) -> DeviceResult<Vec<SimulatedDevice>> {
        let mut seen = HashSet::new();
        let mut devices = Vec::with_capacity(self.devices.len());

        for entry in self.devices {
            if !seen.insert(entry.serial) {
                return Err(DeviceError::InvalidConfig(format!(
                    "duplicate serial {}",
                    entry.serial
                )));
            }

            let mut device = SimulatedDevice::new(entry.serial, entry.name).with_touch(entry.touch);
            device.password = entry.password;

            let mut names = HashSet::new();
            for cred in entry.credentials {
                if cred.name.is_empty() {
                    return Err(DeviceError::InvalidConfig(format!(
                        "device {}: credential name is empty",
                        entry.serial
                    )));
                }
                if !names.insert(cred.name.clone()) {
                    return Err(DeviceError::InvalidConfig(format!(
                        "device {}: duplicate credential {}",
                        entry.serial, cred.name
                    )));
                }
                if cred.digits != 6 && cred.digits != 8 {
                    return Err(DeviceError::InvalidConfig(format!(
                        "credential {}: digits must be 6 or 8, got {}",
                        cred.name, cred.digits
                    )));
                }
                if cred.period == 0 {
                    return Err(DeviceError::InvalidConfig(format!(
                        "credential {}: period must be positive",
                        cred.name
                    )));
                }
                let secret = hex::decode(cred.secret.trim()).map_err(|e| {
                    DeviceError::InvalidConfig(format!("credential {}: secret: {e}", cred.name))
                })?;

                device.credentials.push(SimulatedCredential {
                    name: cred.name,
                    secret,
                    kind: cred.kind,
                    digits: cred.digits,
                    period: cred.period,
                    counter: cred.counter,
                    touch: cred.touch,
                });
            }

            devices.push(device);
        }

        Ok(devices)
    }
}

impl SimulatedBackend {
    /// Build a backend with every device of a topology document attached.
    pub fn from_topology(file: TopologyFile) -> DeviceResult<Self> {
        let backend = Self::new();
        for device in file.into_devices()? {
            backend.plug(device);
        }
        Ok(backend)
    }
}
