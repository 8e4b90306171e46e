//! [`KeyMaterial`]: the AES key loaded from configuration.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroize;

/// Accepted AES key lengths in bytes.
pub const KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Raw AES key bytes.
///
/// The buffer is overwritten with zeroes on drop and never printed.
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    /// Decode a standard base64 key and check its length.
    ///
    /// # Errors
    ///
    /// Returns an error if `encoded` is not valid base64 or does not decode to
    /// 16, 24 or 32 bytes. The error never includes the key itself.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let key = Self(
            STANDARD
                .decode(encoded.trim())
                .context("VALUECRYPT_KEY is not valid base64")?,
        );
        let len = key.0.len();
        if !KEY_LENGTHS.contains(&len) {
            anyhow::bail!("VALUECRYPT_KEY must decode to 16, 24 or 32 bytes, got {len}");
        }
        Ok(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}
