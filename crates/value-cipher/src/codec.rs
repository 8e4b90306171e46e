//! Wire encoding of encrypted values.
//!
//! ```text
//! <b64(body)>.<b64(nonce)>.<b64(tag)>
//! <b64(nonce)>.<b64(tag)>                 (body empty)
//! ```
//!
//! All fields use the standard, padded base64 alphabet. The two-field form is
//! produced whenever the body is empty, e.g. when only the AAD is
//! authenticated.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CipherError, Field};

/// Byte length of an AES-GCM nonce (96 bits).
pub const NONCE_LEN: usize = 12;

/// A parsed encrypted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedValue {
    /// Encrypted bytes, same length as the plaintext.
    pub body: Vec<u8>,
    /// Nonce the value was sealed under.
    pub nonce: [u8; NONCE_LEN],
    /// Authentication tag. Its length is checked when the value is opened.
    pub tag: Vec<u8>,
}

/// Parse an encoded value into its body, nonce and tag.
///
/// # Errors
///
/// - [`CipherError::MalformedFormat`] if `text` has neither 2 nor 3 fields.
/// - [`CipherError::InvalidEncoding`] naming the first field that is not
///   valid base64.
/// - [`CipherError::InvalidNonceLength`] if the nonce is not [`NONCE_LEN`]
///   bytes.
pub fn decode(text: &str) -> Result<EncryptedValue, CipherError> {
    let mut fields: Vec<&str> = text.split('.').collect();
    if fields.len() == 2 {
        fields.insert(0, "");
    }
    let [body, nonce, tag] = fields.as_slice() else {
        return Err(CipherError::MalformedFormat {
            fields: fields.len(),
        });
    };

    let body = decode_field(body, Field::Body)?;
    let nonce_bytes = decode_field(nonce, Field::Nonce)?;
    let nonce: [u8; NONCE_LEN] = nonce_bytes
        .as_slice()
        .try_into()
        .map_err(|_| CipherError::InvalidNonceLength(nonce_bytes.len()))?;
    let tag = decode_field(tag, Field::Tag)?;

    Ok(EncryptedValue { body, nonce, tag })
}

/// Encode a body, nonce and tag into the wire format.
///
/// An empty body yields the two-field form.
pub fn encode(body: &[u8], nonce: &[u8; NONCE_LEN], tag: &[u8]) -> String {
    let nonce = STANDARD.encode(nonce);
    let tag = STANDARD.encode(tag);
    if body.is_empty() {
        format!("{nonce}.{tag}")
    } else {
        format!("{}.{nonce}.{tag}", STANDARD.encode(body))
    }
}

fn decode_field(text: &str, field: Field) -> Result<Vec<u8>, CipherError> {
    STANDARD
        .decode(text)
        .map_err(|source| CipherError::InvalidEncoding { field, source })
}
