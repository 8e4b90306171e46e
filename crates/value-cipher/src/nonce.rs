//! Nonce generation.
//!
//! Every fresh nonce is drawn through [`NonceSource`] so callers (and tests)
//! can supply their own source. [`OsNonceSource`] is the production source and
//! reads from the operating system CSPRNG. A read failure is reported; there
//! is no fallback to a weaker generator.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use crate::codec::NONCE_LEN;
use crate::error::RandomSourceError;

/// Source of fresh 96-bit nonces.
///
/// Implementations must be cryptographically secure: a repeated nonce under
/// the same key breaks AES-GCM.
#[cfg_attr(test, mockall::automock)]
pub trait NonceSource: Send + Sync {
    /// Draw a fresh nonce.
    ///
    /// # Errors
    ///
    /// Returns [`RandomSourceError`] if the underlying source cannot be read.
    fn generate(&self) -> Result<[u8; NONCE_LEN], RandomSourceError>;
}

/// Nonce source backed by the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn generate(&self) -> Result<[u8; NONCE_LEN], RandomSourceError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| RandomSourceError(e.to_string()))?;
        Ok(nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_source_produces_distinct_nonces() {
        let a = OsNonceSource.generate().unwrap();
        let b = OsNonceSource.generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn mock_source_is_a_nonce_source() {
        let mut mock = MockNonceSource::new();
        mock.expect_generate().returning(|| Ok([5u8; NONCE_LEN]));
        let source: &dyn NonceSource = &mock;
        assert_eq!(source.generate().unwrap(), [5u8; NONCE_LEN]);
    }
}
