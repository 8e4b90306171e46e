//! AES-GCM encryption of individual secret values.
//!
//! Each value in a secrets document is encrypted on its own, under a
//! caller-supplied key and an AAD string (usually the value's path in the
//! document), into a compact text form:
//!
//! ```text
//! <base64(body)>.<base64(nonce)>.<base64(tag)>
//! ```
//!
//! See [`codec`] for the grammar. [`decrypt`] returns a [`Stash`] that can be
//! handed back to [`encrypt`] so that re-encrypting an unchanged value yields
//! the same ciphertext.
//!
//! # Security invariants
//!
//! - A nonce is only reused for the exact plaintext it was first used with.
//! - Errors never carry key material, plaintext, or the rejected ciphertext.
//! - Nothing is emitted on an error path.

pub mod codec;
pub mod engine;
pub mod error;
pub mod nonce;
pub mod stash;

pub use codec::{EncryptedValue, NONCE_LEN};
pub use engine::{decrypt, encrypt, encrypt_with, Decrypted};
pub use error::{CipherError, Field, RandomSourceError, Stage};
pub use nonce::{NonceSource, OsNonceSource};
pub use stash::Stash;
