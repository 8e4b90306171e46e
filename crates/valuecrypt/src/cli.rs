//! Command-line definitions for `valuecrypt`.

use clap::{Parser, Subcommand};

/// Encrypt or decrypt a single secret value with AES-GCM.
///
/// The value is read from stdin and the result written to stdout. The key is
/// taken from the `VALUECRYPT_KEY` environment variable (standard base64).
#[derive(Debug, Parser)]
#[command(name = "valuecrypt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt the plaintext read from stdin
    Encrypt {
        /// Additional authenticated data, usually the value's path
        #[arg(long, default_value = "")]
        aad: String,

        /// Previous ciphertext of this value; reused verbatim if the plaintext is unchanged
        #[arg(long)]
        previous: Option<String>,
    },

    /// Decrypt the ciphertext read from stdin
    Decrypt {
        /// Additional authenticated data the value was encrypted with
        #[arg(long, default_value = "")]
        aad: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_encrypt_with_previous() {
        let cli = Cli::try_parse_from([
            "valuecrypt",
            "encrypt",
            "--aad",
            "db:password:",
            "--previous",
            "a.b.c",
        ])
        .unwrap();
        match cli.command {
            Command::Encrypt { aad, previous } => {
                assert_eq!(aad, "db:password:");
                assert_eq!(previous.as_deref(), Some("a.b.c"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn aad_defaults_to_empty() {
        let cli = Cli::try_parse_from(["valuecrypt", "decrypt"]).unwrap();
        assert!(matches!(cli.command, Command::Decrypt { ref aad } if aad.is_empty()));
    }
}
