//! In-memory device backend.
//!
//! A [`SimulatedBackend`] is a cloneable handle onto shared device state, so
//! the game can hold one clone while a test (or the shell) plugs and unplugs
//! devices through another.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{CredentialSession, DeviceBackend};
use crate::credential::{Credential, CredentialId, DerivedKey, OathKind, OneTimeCode};
use crate::error::{DeviceError, DeviceResult};
use crate::oath;
use crate::token::{DeviceInfo, DeviceScan, TokenId, TopologyFingerprint};

/// Default time a simulated device waits for a touch before giving up.
pub const DEFAULT_TOUCH_TIMEOUT: Duration = Duration::from_secs(15);

/// How a simulated device answers a touch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchResponse {
    /// The touch is confirmed immediately.
    #[default]
    Confirm,
    /// Nobody touches the device; the request times out.
    Ignore,
}

/// Source of the current time for TOTP calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Wall-clock time.
    #[default]
    System,
    /// A fixed Unix timestamp.
    Fixed(i64),
}

impl Clock {
    /// The current Unix timestamp.
    pub fn now(&self) -> i64 {
        match self {
            Self::System => chrono::Utc::now().timestamp(),
            Self::Fixed(t) => *t,
        }
    }
}

/// A credential stored on a simulated device.
#[derive(Debug, Clone)]
pub struct SimulatedCredential {
    /// Credential name, used as its identifier.
    pub name: String,
    /// Shared secret.
    pub secret: Vec<u8>,
    /// Time- or counter-based.
    pub kind: OathKind,
    /// Code length (6 or 8).
    pub digits: u8,
    /// TOTP time step in seconds.
    pub period: u32,
    /// Next HOTP counter value.
    pub counter: u64,
    /// Whether a touch is required to calculate a code.
    pub touch: bool,
}

impl SimulatedCredential {
    /// A six-digit, 30-second TOTP credential.
    pub fn totp(name: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
            kind: OathKind::Totp,
            digits: 6,
            period: 30,
            counter: 0,
            touch: false,
        }
    }

    /// A six-digit HOTP credential starting at counter zero.
    pub fn hotp(name: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: OathKind::Hotp,
            ..Self::totp(name, secret)
        }
    }

    /// Set the code length.
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Require a touch to calculate codes.
    pub fn with_touch(mut self, touch: bool) -> Self {
        self.touch = touch;
        self
    }

    fn id(&self) -> CredentialId {
        CredentialId::from(self.name.as_str())
    }

    fn listing(&self) -> Credential {
        Credential {
            id: self.id(),
            kind: self.kind,
            digits: self.digits,
            period: self.period,
            touch_required: self.touch,
        }
    }
}

/// A simulated authentication device.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    /// Serial number.
    pub serial: TokenId,
    /// Model name.
    pub name: String,
    /// Unlock password, if the OATH application is protected.
    pub password: Option<String>,
    /// Touch behaviour.
    pub touch: TouchResponse,
    /// Stored credentials.
    pub credentials: Vec<SimulatedCredential>,
}

impl SimulatedDevice {
    /// A device with no password and no credentials.
    pub fn new(serial: TokenId, name: impl Into<String>) -> Self {
        Self {
            serial,
            name: name.into(),
            password: None,
            touch: TouchResponse::Confirm,
            credentials: Vec::new(),
        }
    }

    /// Protect the device with a password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set how the device answers touch requests.
    pub fn with_touch(mut self, touch: TouchResponse) -> Self {
        self.touch = touch;
        self
    }

    /// Add a credential.
    pub fn with_credential(mut self, credential: SimulatedCredential) -> Self {
        self.credentials.push(credential);
        self
    }
}

#[derive(Debug, Default)]
struct Topology {
    devices: Vec<SimulatedDevice>,
    generation: u64,
    enumerate_calls: usize,
    calculate_calls: usize,
}

impl Topology {
    fn device(&self, serial: TokenId) -> DeviceResult<&SimulatedDevice> {
        self.devices
            .iter()
            .find(|d| d.serial == serial)
            .ok_or(DeviceError::NotConnected(serial))
    }

    fn device_mut(&mut self, serial: TokenId) -> DeviceResult<&mut SimulatedDevice> {
        self.devices
            .iter_mut()
            .find(|d| d.serial == serial)
            .ok_or(DeviceError::NotConnected(serial))
    }
}

/// In-memory implementation of [`DeviceBackend`].
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    topology: Arc<Mutex<Topology>>,
    touch_timeout: Duration,
    clock: Clock,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    /// A backend with no devices attached.
    pub fn new() -> Self {
        Self {
            topology: Arc::new(Mutex::new(Topology::default())),
            touch_timeout: DEFAULT_TOUCH_TIMEOUT,
            clock: Clock::System,
        }
    }

    /// Set how long an ignored touch request blocks before failing.
    pub fn with_touch_timeout(mut self, timeout: Duration) -> Self {
        self.touch_timeout = timeout;
        self
    }

    /// Set the clock used for TOTP codes.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a device. A device with the same serial is replaced.
    pub fn plug(&self, device: SimulatedDevice) {
        let mut topology = self.lock();
        topology.devices.retain(|d| d.serial != device.serial);
        debug!(serial = %device.serial, "simulated device plugged");
        topology.devices.push(device);
        topology.generation += 1;
    }

    /// Detach a device. Returns whether it was attached.
    pub fn unplug(&self, serial: TokenId) -> bool {
        let mut topology = self.lock();
        let before = topology.devices.len();
        topology.devices.retain(|d| d.serial != serial);
        let removed = topology.devices.len() != before;
        if removed {
            debug!(%serial, "simulated device unplugged");
            topology.generation += 1;
        }
        removed
    }

    /// Number of full enumerations performed so far.
    pub fn enumerate_calls(&self) -> usize {
        self.lock().enumerate_calls
    }

    /// Number of code calculations attempted so far.
    pub fn calculate_calls(&self) -> usize {
        self.lock().calculate_calls
    }

    fn lock(&self) -> MutexGuard<'_, Topology> {
        self.topology.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DeviceBackend for SimulatedBackend {
    fn fingerprint(&self) -> DeviceResult<TopologyFingerprint> {
        Ok(TopologyFingerprint(self.lock().generation))
    }

    fn enumerate(&self) -> DeviceResult<DeviceScan> {
        let mut topology = self.lock();
        topology.enumerate_calls += 1;
        let devices = topology
            .devices
            .iter()
            .map(|d| DeviceInfo {
                token: d.serial,
                name: d.name.clone(),
            })
            .collect();
        Ok(DeviceScan {
            devices,
            fingerprint: TopologyFingerprint(topology.generation),
        })
    }

    fn open_session(&self, token: TokenId) -> DeviceResult<Box<dyn CredentialSession>> {
        let topology = self.lock();
        let device = topology.device(token)?;
        debug!(%token, locked = device.password.is_some(), "opening credential session");
        Ok(Box::new(SimulatedSession {
            backend: self.clone(),
            serial: token,
            locked: device.password.is_some(),
        }))
    }
}

/// Credential session on a [`SimulatedDevice`].
#[derive(Debug)]
pub struct SimulatedSession {
    backend: SimulatedBackend,
    serial: TokenId,
    locked: bool,
}

impl CredentialSession for SimulatedSession {
    fn is_locked(&self) -> bool {
        self.locked
    }

    fn derive_key(&self, password: &str) -> DerivedKey {
        oath::derive_key(password, self.serial)
    }

    fn validate(&mut self, key: &DerivedKey) -> DeviceResult<()> {
        let topology = self.backend.lock();
        let device = topology.device(self.serial)?;
        let Some(password) = &device.password else {
            self.locked = false;
            return Ok(());
        };
        if oath::derive_key(password, self.serial) == *key {
            self.locked = false;
            Ok(())
        } else {
            Err(DeviceError::WrongPassword)
        }
    }

    fn list_credentials(&mut self) -> DeviceResult<BTreeMap<CredentialId, Credential>> {
        let topology = self.backend.lock();
        let device = topology.device(self.serial)?;
        if self.locked {
            return Err(DeviceError::Locked);
        }
        Ok(device
            .credentials
            .iter()
            .map(|c| (c.id(), c.listing()))
            .collect())
    }

    fn calculate_code(&mut self, credential: &Credential) -> DeviceResult<OneTimeCode> {
        let mut topology = self.backend.lock();
        topology.calculate_calls += 1;
        if self.locked {
            return Err(DeviceError::Locked);
        }

        let device = topology.device_mut(self.serial)?;
        let touch = device.touch;
        let stored = device
            .credentials
            .iter_mut()
            .find(|c| c.id() == credential.id)
            .ok_or_else(|| DeviceError::UnknownCredential(credential.id.to_string()))?;

        if stored.touch && touch == TouchResponse::Ignore {
            drop(topology);
            debug!(timeout = ?self.backend.touch_timeout, "waiting for touch");
            std::thread::sleep(self.backend.touch_timeout);
            return Err(DeviceError::TouchTimeout);
        }

        let code = match stored.kind {
            OathKind::Totp => {
                let now = self.backend.clock.now();
                let step = oath::time_step(now, stored.period);
                let period = i64::from(stored.period.max(1));
                let valid_from = i64::try_from(step).unwrap_or(0) * period;
                OneTimeCode {
                    value: oath::hotp(&stored.secret, step, stored.digits)?,
                    valid_from,
                    valid_to: Some(valid_from + period),
                }
            }
            OathKind::Hotp => {
                let value = oath::hotp(&stored.secret, stored.counter, stored.digits)?;
                stored.counter += 1;
                OneTimeCode {
                    value,
                    valid_from: self.backend.clock.now(),
                    valid_to: None,
                }
            }
        };
        Ok(code)
    }
}
