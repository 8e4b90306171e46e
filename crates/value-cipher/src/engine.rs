//! AES-GCM encryption and decryption of individual string values.
//!
//! Both operations are stateless: the key, AAD and optional [`Stash`] are
//! passed on every call and nothing is retained between calls, so any number
//! of values can be processed concurrently.
//!
//! **Nonce reuse.** AES-GCM must never seal two different (plaintext, AAD)
//! pairs under the same key and nonce. The only nonce that is ever reused is a
//! stashed one, and only when the plaintext is byte-for-byte identical to the
//! one the stash was decrypted from, which reproduces the previous ciphertext.

use std::fmt;

use aes_gcm::aead::{consts::U12, Aead, KeyInit, Payload};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use tracing::{debug, trace};

use crate::codec::{self, NONCE_LEN};
use crate::error::CipherError;
use crate::nonce::{NonceSource, OsNonceSource};
use crate::stash::Stash;

/// AES block size. The GCM tag is split off the sealed output at this length,
/// which is also the tag size for AES-GCM. The wire format depends on it.
const AES_BLOCK_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// AES-GCM instance for one of the three AES key sizes.
enum Gcm {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Gcm {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let gcm = match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Gcm::Aes128),
            24 => Aes192Gcm::new_from_slice(key).map(Gcm::Aes192),
            32 => Aes256Gcm::new_from_slice(key).map(Gcm::Aes256),
            len => return Err(CipherError::InvalidKeySize(len)),
        };
        gcm.map_err(|_| CipherError::InvalidKeySize(key.len()))
    }

    /// Returns `body || tag`.
    fn seal(
        &self,
        nonce: &[u8; NONCE_LEN],
        msg: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Gcm::Aes128(c) => c.encrypt(nonce, Payload { msg, aad }),
            Gcm::Aes192(c) => c.encrypt(nonce, Payload { msg, aad }),
            Gcm::Aes256(c) => c.encrypt(nonce, Payload { msg, aad }),
        }
    }

    /// Opens `body || tag`. Inputs shorter than a tag fail authentication.
    fn open(
        &self,
        nonce: &[u8; NONCE_LEN],
        msg: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(nonce);
        match self {
            Gcm::Aes128(c) => c.decrypt(nonce, Payload { msg, aad }),
            Gcm::Aes192(c) => c.decrypt(nonce, Payload { msg, aad }),
            Gcm::Aes256(c) => c.decrypt(nonce, Payload { msg, aad }),
        }
    }
}

/// Result of a successful [`decrypt`].
pub struct Decrypted {
    /// The authenticated plaintext.
    pub plaintext: String,
    /// Hint to pass back to [`encrypt`] for the same value. `None` when the
    /// input was the empty, never-encrypted value.
    pub stash: Option<Stash>,
}

impl fmt::Debug for Decrypted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decrypted")
            .field("plaintext", &"[REDACTED]")
            .field("stash", &self.stash)
            .finish()
    }
}

/// Decrypt an encoded value.
///
/// An empty `ciphertext` with empty `aad` is the value that was never
/// encrypted and decrypts to `""` with no stash.
///
/// # Errors
///
/// - Any [`codec::decode`] error, unchanged.
/// - [`CipherError::InvalidKeySize`] if `key` is not 16, 24 or 32 bytes.
/// - [`CipherError::AuthenticationFailed`] for a wrong key, wrong `aad`, or
///   tampered value. These causes are not distinguished.
/// - [`CipherError::InvalidPlaintext`] if the plaintext is not UTF-8.
pub fn decrypt(ciphertext: &str, key: &[u8], aad: &[u8]) -> Result<Decrypted, CipherError> {
    if ciphertext.is_empty() && aad.is_empty() {
        trace!("empty value, nothing to decrypt");
        return Ok(Decrypted {
            plaintext: String::new(),
            stash: None,
        });
    }

    let value = codec::decode(ciphertext)?;
    let gcm = Gcm::new(key)?;

    let mut sealed = value.body;
    sealed.extend_from_slice(&value.tag);
    let opened = gcm.open(&value.nonce, &sealed, aad).map_err(|_| {
        debug!("AES-GCM authentication failed");
        CipherError::AuthenticationFailed
    })?;

    let plaintext = String::from_utf8(opened).map_err(|_| CipherError::InvalidPlaintext)?;
    let stash = Stash::new(value.nonce, plaintext.clone());
    Ok(Decrypted {
        plaintext,
        stash: Some(stash),
    })
}

/// Encrypt `plaintext` with a nonce from the OS CSPRNG.
///
/// See [`encrypt_with`].
pub fn encrypt(
    plaintext: &str,
    key: &[u8],
    aad: &[u8],
    stash: Option<&Stash>,
) -> Result<String, CipherError> {
    encrypt_with(plaintext, key, aad, stash, &OsNonceSource)
}

/// Encrypt `plaintext`, drawing any fresh nonce from `source`.
///
/// An empty `plaintext` with empty `aad` encodes as `""`. If `stash` was
/// produced by decrypting this same plaintext, its nonce is reused and the
/// previous ciphertext is reproduced exactly; otherwise a fresh nonce is drawn.
///
/// # Errors
///
/// - [`CipherError::InvalidKeySize`] if `key` is not 16, 24 or 32 bytes.
/// - [`CipherError::RandomSourceFailure`] if `source` fails.
pub fn encrypt_with<S>(
    plaintext: &str,
    key: &[u8],
    aad: &[u8],
    stash: Option<&Stash>,
    source: &S,
) -> Result<String, CipherError>
where
    S: NonceSource + ?Sized,
{
    if plaintext.is_empty() && aad.is_empty() {
        trace!("empty value, nothing to encrypt");
        return Ok(String::new());
    }

    let gcm = Gcm::new(key)?;

    let nonce = match stash.and_then(|s| s.nonce_for(plaintext)) {
        Some(nonce) => {
            debug!("plaintext unchanged, reusing stashed nonce");
            nonce
        }
        None => {
            trace!(stashed = stash.is_some(), "drawing fresh nonce");
            source.generate()?
        }
    };

    let mut body = gcm
        .seal(&nonce, plaintext.as_bytes(), aad)
        .map_err(|_| CipherError::AuthenticationFailed)?;
    let tag = body.split_off(body.len() - AES_BLOCK_SIZE);

    Ok(codec::encode(&body, &nonce, &tag))
}
