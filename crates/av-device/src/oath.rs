//! OATH primitives: HMAC, password key derivation and code truncation.
//!
//! Simulated devices use HMAC-SHA256 throughout. Password keys are the first
//! 16 bytes of PBKDF2 with the device serial as salt.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::credential::DerivedKey;
use crate::error::{DeviceError, DeviceResult};
use crate::token::TokenId;

type HmacSha256 = Hmac<Sha256>;

/// PBKDF2 iteration count for password-derived keys.
pub const KEY_ITERATIONS: u32 = 1000;

/// HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> DeviceResult<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| DeviceError::InvalidConfig(format!("credential secret: {e}")))?;
    mac.update(message);

    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Derive the unlock key of a device from a password.
pub fn derive_key(password: &str, token: TokenId) -> DerivedKey {
    let mut key = [0u8; 16];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        &token.0.to_be_bytes(),
        KEY_ITERATIONS,
        &mut key,
    );
    DerivedKey(key)
}

/// Counter-based code (RFC 4226 dynamic truncation), 6 or 8 digits long.
pub fn hotp(secret: &[u8], counter: u64, digits: u8) -> DeviceResult<String> {
    if !matches!(digits, 6 | 8) {
        return Err(DeviceError::InvalidConfig(format!("unsupported code length: {digits}")));
    }

    let mac = hmac_sha256(secret, &counter.to_be_bytes())?;
    let offset = usize::from(mac[mac.len() - 1] & 0x0f);
    let binary = u32::from_be_bytes([
        mac[offset] & 0x7f,
        mac[offset + 1],
        mac[offset + 2],
        mac[offset + 3],
    ]);
    let modulus = 10u32.pow(u32::from(digits));
    Ok(format!("{:0width$}", binary % modulus, width = usize::from(digits)))
}

/// Time step index for a Unix timestamp.
pub fn time_step(timestamp: i64, period: u32) -> u64 {
    let seconds = u64::try_from(timestamp).unwrap_or(0);
    seconds / u64::from(period.max(1))
}

/// Time-based code for a Unix timestamp.
pub fn totp(secret: &[u8], timestamp: i64, period: u32, digits: u8) -> DeviceResult<String> {
    hotp(secret, time_step(timestamp, period), digits)
}
