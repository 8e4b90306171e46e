//! Error types produced by the codec and the AEAD engine.

use std::fmt;

use thiserror::Error;

use crate::codec::NONCE_LEN;

/// One of the three dot-separated fields of an encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Body,
    Nonce,
    Tag,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Body => "body",
            Field::Nonce => "nonce",
            Field::Tag => "tag",
        })
    }
}

/// Processing stage at which a [`CipherError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Splitting or base64-decoding the wire string.
    Parse,
    /// Building the AES block cipher from the key.
    CipherInit,
    /// Drawing a fresh nonce.
    Nonce,
    /// Sealing or opening the AEAD payload.
    Authentication,
}

/// The random source could not produce nonce bytes.
#[derive(Debug, Error)]
#[error("random source unavailable: {0}")]
pub struct RandomSourceError(pub String);

/// Errors produced by the cipher layer.
///
/// Messages never include key material, plaintext, or the ciphertext that
/// failed to parse.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The encoded value does not have two or three dot-separated fields.
    #[error("malformed encrypted value: expected 2 or 3 dot-separated fields, found {fields}")]
    MalformedFormat { fields: usize },

    /// A field is not valid padded standard base64.
    #[error("invalid base64 in {field} field")]
    InvalidEncoding {
        field: Field,
        #[source]
        source: base64::DecodeError,
    },

    /// The decoded nonce is not [`NONCE_LEN`] bytes.
    #[error("invalid nonce length: expected {NONCE_LEN} bytes, got {0}")]
    InvalidNonceLength(usize),

    /// The key is not an AES-128, AES-192 or AES-256 key.
    #[error("invalid key size: expected 16, 24 or 32 bytes, got {0}")]
    InvalidKeySize(usize),

    /// AES-GCM open failed: wrong key, wrong aad, or tampered data.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// No nonce could be drawn from the random source.
    #[error("could not generate nonce")]
    RandomSourceFailure(#[from] RandomSourceError),

    /// The authenticated plaintext is not valid UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    InvalidPlaintext,
}

impl CipherError {
    /// Returns the stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            CipherError::MalformedFormat { .. }
            | CipherError::InvalidEncoding { .. }
            | CipherError::InvalidNonceLength(_) => Stage::Parse,
            CipherError::InvalidKeySize(_) => Stage::CipherInit,
            CipherError::RandomSourceFailure(_) => Stage::Nonce,
            CipherError::AuthenticationFailed | CipherError::InvalidPlaintext => {
                Stage::Authentication
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages() {
        assert_eq!(
            CipherError::MalformedFormat { fields: 1 }.stage(),
            Stage::Parse
        );
        assert_eq!(CipherError::InvalidNonceLength(8).stage(), Stage::Parse);
        assert_eq!(CipherError::InvalidKeySize(7).stage(), Stage::CipherInit);
        assert_eq!(
            CipherError::RandomSourceFailure(RandomSourceError("x".into())).stage(),
            Stage::Nonce
        );
        assert_eq!(
            CipherError::AuthenticationFailed.stage(),
            Stage::Authentication
        );
    }

    #[test]
    fn display_names_failing_field() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let source = STANDARD.decode("!!!").unwrap_err();
        let e = CipherError::InvalidEncoding {
            field: Field::Tag,
            source,
        };
        assert_eq!(e.to_string(), "invalid base64 in tag field");
    }

    #[test]
    fn display_includes_lengths() {
        assert!(CipherError::InvalidNonceLength(8).to_string().contains("got 8"));
        assert!(CipherError::InvalidKeySize(20).to_string().contains("got 20"));
    }
}
