//! Command implementations: one value in on stdin, one value out on stdout.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};
use value_cipher::Stash;
use zeroize::Zeroizing;

use crate::cli::Command;
use crate::key::KeyMaterial;

/// Execute `command` over the value read from `input`, writing the result to
/// `output`.
///
/// A single trailing newline (`\n` or `\r\n`) is stripped from the input. No
/// newline is appended to the output. Nothing is written if the command fails.
///
/// # Errors
///
/// Returns an error if reading or writing fails, or if the cipher rejects the
/// value.
pub fn run<R: Read, W: Write>(
    command: &Command,
    key: &KeyMaterial,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let mut raw = Zeroizing::new(String::new());
    input
        .read_to_string(&mut raw)
        .context("failed to read value from stdin")?;
    let value = strip_trailing_newline(&raw);

    let result = match command {
        Command::Encrypt { aad, previous } => {
            let stash = previous
                .as_deref()
                .and_then(|prev| stash_from_previous(prev, key, aad));
            let ciphertext =
                value_cipher::encrypt(value, key.as_bytes(), aad.as_bytes(), stash.as_ref())
                    .context("encryption failed")?;
            info!(
                stash_supplied = stash.is_some(),
                reused = previous.as_deref() == Some(ciphertext.as_str()),
                "value encrypted"
            );
            Zeroizing::new(ciphertext)
        }
        Command::Decrypt { aad } => {
            let decrypted = value_cipher::decrypt(value, key.as_bytes(), aad.as_bytes())
                .context("decryption failed")?;
            info!("value decrypted");
            Zeroizing::new(decrypted.plaintext)
        }
    };

    output
        .write_all(result.as_bytes())
        .and_then(|()| output.flush())
        .context("failed to write result to stdout")?;
    Ok(())
}

/// Decrypt the previous ciphertext of a value to obtain its stash.
///
/// A previous ciphertext that cannot be decrypted only costs the stability
/// optimisation, so the value is encrypted under a fresh nonce instead.
fn stash_from_previous(previous: &str, key: &KeyMaterial, aad: &str) -> Option<Stash> {
    match value_cipher::decrypt(previous, key.as_bytes(), aad.as_bytes()) {
        Ok(decrypted) => decrypted.stash,
        Err(e) => {
            warn!(
                error = %e,
                stage = ?e.stage(),
                "previous ciphertext unusable; using a fresh nonce"
            );
            None
        }
    }
}

fn strip_trailing_newline(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn key() -> KeyMaterial {
        KeyMaterial::from_base64(&STANDARD.encode([0u8; 16])).unwrap()
    }

    fn exec(command: Command, input: &str) -> Result<String> {
        let mut out = Vec::new();
        run(&command, &key(), input.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn encrypt_cmd(aad: &str, previous: Option<&str>) -> Command {
        Command::Encrypt {
            aad: aad.into(),
            previous: previous.map(str::to_owned),
        }
    }

    fn decrypt_cmd(aad: &str) -> Command {
        Command::Decrypt { aad: aad.into() }
    }

    #[test]
    fn encrypt_then_decrypt() {
        let ct = exec(encrypt_cmd("db:password:", None), "hunter2\n").unwrap();
        assert!(!ct.ends_with('\n'));
        assert_eq!(ct.split('.').count(), 3);
        let pt = exec(decrypt_cmd("db:password:"), &format!("{ct}\n")).unwrap();
        assert_eq!(pt, "hunter2");
    }

    #[test]
    fn decrypts_known_value() {
        let pt = exec(
            decrypt_cmd(""),
            "a+22og8=.AAAAAAAAAAAAAAAA./AXzR10pA0yqHMj6NijDnw==\r\n",
        )
        .unwrap();
        assert_eq!(pt, "hello");
    }

    #[test]
    fn unchanged_value_keeps_previous_ciphertext() {
        let c1 = exec(encrypt_cmd("a", None), "same").unwrap();
        let c2 = exec(encrypt_cmd("a", Some(&c1)), "same").unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn changed_value_gets_new_ciphertext() {
        let c1 = exec(encrypt_cmd("a", None), "before").unwrap();
        let c2 = exec(encrypt_cmd("a", Some(&c1)), "after").unwrap();
        assert_ne!(c1, c2);
        assert_eq!(exec(decrypt_cmd("a"), &c2).unwrap(), "after");
    }

    #[test]
    fn unusable_previous_falls_back_to_fresh_nonce() {
        let ct = exec(encrypt_cmd("a", Some("garbage")), "value").unwrap();
        assert_eq!(exec(decrypt_cmd("a"), &ct).unwrap(), "value");
    }

    #[test]
    fn wrong_aad_writes_nothing() {
        let ct = exec(encrypt_cmd("a", None), "value").unwrap();
        let mut out = Vec::new();
        let err = run(&decrypt_cmd("b"), &key(), ct.as_bytes(), &mut out).unwrap_err();
        assert!(out.is_empty());
        assert!(format!("{err:#}").contains("authentication failed"));
    }

    #[test]
    fn empty_value_round_trips_as_empty() {
        assert_eq!(exec(encrypt_cmd("", None), "\n").unwrap(), "");
        assert_eq!(exec(decrypt_cmd(""), "").unwrap(), "");
    }

    #[test]
    fn strips_only_one_newline() {
        assert_eq!(strip_trailing_newline("a\n\n"), "a\n");
        assert_eq!(strip_trailing_newline("a\r\n"), "a");
        assert_eq!(strip_trailing_newline("a"), "a");
    }
}
