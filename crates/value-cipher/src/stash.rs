//! [`Stash`]: caller-held hint that keeps re-encrypted values stable.

use std::fmt;

use zeroize::Zeroize;

use crate::codec::NONCE_LEN;

/// Nonce and plaintext recovered by [`decrypt`](crate::decrypt).
///
/// Passing the stash back to [`encrypt`](crate::encrypt) for the same logical
/// value reuses its nonce when, and only when, the plaintext is unchanged, so
/// the output is byte-identical to the ciphertext the stash came from. Any
/// other plaintext gets a fresh nonce.
///
/// The plaintext copy is zeroed on drop and never printed.
pub struct Stash {
    nonce: [u8; NONCE_LEN],
    plaintext: String,
}

impl Stash {
    pub(crate) fn new(nonce: [u8; NONCE_LEN], plaintext: String) -> Self {
        Self { nonce, plaintext }
    }

    /// Returns the stashed nonce if `plaintext` equals the stashed plaintext.
    pub(crate) fn nonce_for(&self, plaintext: &str) -> Option<[u8; NONCE_LEN]> {
        (self.plaintext == plaintext).then_some(self.nonce)
    }
}

impl Drop for Stash {
    fn drop(&mut self) {
        self.plaintext.zeroize();
    }
}

impl fmt::Debug for Stash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Stash([REDACTED])")
    }
}
