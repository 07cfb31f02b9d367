use cryptolab::classic::ClassicalKey;
use cryptolab::primitives::{
    benchmark_aes, benchmark_rsa, hybrid_decrypt, hybrid_encrypt, AesKeySize,
};
use cryptolab::{
    analyze, audit_aes_implementation, audit_rsa_key, caesar_attack, chi_squared,
    estimate_vigenere_key, evaluate_aes, evaluate_rsa, playfair_decrypt, playfair_encrypt,
    vigenere_decrypt, vigenere_encrypt, vigenere_key_length, AesMode, AesPrimitive, Config,
    RsaPrimitive, RustCryptoAes, RustCryptoRsa, Shift, VigenereKey,
};

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use std::{
    collections::BTreeMap,
    io::Read,
    path::{Path, PathBuf},
};

// Characters of decrypted text shown next to a recovered Vigenère key.
const PREVIEW_CHARS: usize = 200;

/// Classical ciphers, cryptanalysis and AES/RSA strength scoring.
#[derive(Parser)]
#[command(name = "cryptolab", version)]
struct Cli {
    /// JSON config file; defaults to $CRYPTOLAB_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Direction {
    Encrypt,
    Decrypt,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    Aes,
    Rsa,
}

#[derive(Subcommand)]
enum Command {
    /// Shift every letter by a fixed amount in 0..=25.
    Caesar {
        direction: Direction,
        #[arg(short, long, allow_hyphen_values = true)]
        shift: i64,
        text: Option<String>,
    },
    Vigenere {
        direction: Direction,
        #[arg(short, long)]
        key: String,
        text: Option<String>,
    },
    Playfair {
        direction: Direction,
        #[arg(short, long)]
        key: String,
        text: Option<String>,
    },
    /// Letter percentages and chi-squared distance from Spanish.
    Frequency { text: Option<String> },
    /// Rank all 26 Caesar shifts.
    CrackCaesar {
        #[arg(long)]
        top: Option<usize>,
        text: Option<String>,
    },
    /// Guess the key length of a Vigenère ciphertext.
    KeyLength {
        #[arg(long)]
        max: Option<usize>,
        text: Option<String>,
    },
    /// Recover a Vigenère key of known length and preview the decryption.
    EstimateKey {
        #[arg(short, long)]
        length: usize,
        text: Option<String>,
    },
    /// Print a random base64 AES key.
    GenerateAesKey {
        /// 128, 192 or 256; defaults to the configured size.
        #[arg(long)]
        bits: Option<usize>,
    },
    /// Print a fresh RSA key pair as PEM.
    GenerateRsaKeypair {
        #[arg(long)]
        bits: Option<usize>,
    },
    EvaluateAes {
        #[arg(long)]
        bits: usize,
        #[arg(long)]
        mode: String,
    },
    EvaluateRsa {
        #[arg(long)]
        bits: usize,
        #[arg(long, default_value = "OAEP")]
        padding: String,
    },
    /// Encrypt with the built-in AES and audit the output.
    AuditAes {
        #[arg(long, default_value = "CBC")]
        mode: AesMode,
        /// Base64 key; a random one is generated when omitted.
        #[arg(long)]
        key: Option<String>,
        text: Option<String>,
    },
    /// Audit an RSA public key; a fresh key is generated when omitted.
    AuditRsa {
        #[arg(long)]
        public_key: Option<PathBuf>,
    },
    /// Encrypt with a fresh RSA key pair plus AES-256-CBC and decrypt again.
    Hybrid { text: Option<String> },
    Benchmark {
        #[arg(value_enum)]
        algorithm: Algorithm,
        text: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(cli.command, &config)
}

fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Caesar {
            direction,
            shift,
            text,
        } => {
            let output = apply_caesar(direction, shift, &read_text(text)?)?;
            print_json(&json!({ "result": output }))
        }
        Command::Vigenere {
            direction,
            key,
            text,
        } => {
            let text = read_text(text)?;
            let key = VigenereKey::new(&key)?;
            let output = match direction {
                Direction::Encrypt => vigenere_encrypt(&text, &key),
                Direction::Decrypt => vigenere_decrypt(&text, &key),
            };
            print_json(&json!({ "result": output }))
        }
        Command::Playfair {
            direction,
            key,
            text,
        } => {
            let text = read_text(text)?;
            let output = match direction {
                Direction::Encrypt => playfair_encrypt(&text, &key),
                Direction::Decrypt => playfair_decrypt(&text, &key),
            };
            print_json(&json!({ "result": output }))
        }
        Command::Frequency { text } => {
            let frequencies = analyze(&read_text(text)?);
            let percentages: BTreeMap<String, f64> = frequencies
                .iter()
                .map(|(letter, pct)| (letter.to_string(), pct))
                .collect();
            print_json(&json!({
                "frequencies": percentages,
                "chi_squared": chi_squared(&frequencies),
            }))
        }
        Command::CrackCaesar { top, text } => {
            let mut candidates = caesar_attack(&read_text(text)?);
            candidates.truncate(top.unwrap_or(config.caesar_top_k));
            print_json(&candidates)
        }
        Command::KeyLength { max, text } => {
            let estimates =
                vigenere_key_length(&read_text(text)?, max.unwrap_or(config.max_key_length));
            print_json(&estimates)
        }
        Command::EstimateKey { length, text } => {
            print_json(&key_estimate(&read_text(text)?, length)?)
        }
        Command::GenerateAesKey { bits } => {
            let size = match bits {
                Some(bits) => AesKeySize::from_bits(bits)?,
                None => config.aes_key_size()?,
            };
            print_json(&aes_key_json(size))
        }
        Command::GenerateRsaKeypair { bits } => {
            let keypair = RustCryptoRsa.generate_keypair(bits.unwrap_or(config.rsa_key_bits))?;
            print_json(&json!({
                "key_size": keypair.bits,
                "public_key": keypair.public_key_pem,
                "private_key": keypair.private_key_pem,
            }))
        }
        Command::EvaluateAes { bits, mode } => print_json(&evaluate_aes(bits, &mode)),
        Command::EvaluateRsa { bits, padding } => print_json(&evaluate_rsa(bits, &padding)),
        Command::AuditAes { mode, key, text } => {
            let text = read_text(text)?;
            let key = match key {
                Some(key) => STANDARD.decode(key.trim()).context("key is not valid base64")?,
                None => RustCryptoAes.generate_key(config.aes_key_size()?),
            };
            let audit = audit_aes_implementation(&RustCryptoAes, text.as_bytes(), &key, mode)?;
            print_json(&audit)
        }
        Command::AuditRsa { public_key } => {
            let pem = match public_key {
                Some(path) => read_file(&path)?,
                None => {
                    RustCryptoRsa
                        .generate_keypair(config.rsa_key_bits)?
                        .public_key_pem
                }
            };
            print_json(&audit_rsa_key(&RustCryptoRsa, &pem)?)
        }
        Command::Hybrid { text } => {
            let text = read_text(text)?;
            let keypair = RustCryptoRsa.generate_keypair(config.rsa_key_bits)?;
            let encrypted = hybrid_encrypt(
                &RustCryptoAes,
                &RustCryptoRsa,
                &keypair.public_key_pem,
                text.as_bytes(),
            )?;
            let decrypted = hybrid_decrypt(
                &RustCryptoAes,
                &RustCryptoRsa,
                &keypair.private_key_pem,
                &encrypted,
            )?;
            if decrypted != text.as_bytes() {
                bail!("hybrid round trip did not return the original message");
            }
            print_json(&json!({
                "method": encrypted.method,
                "public_key": keypair.public_key_pem,
                "encrypted_key": STANDARD.encode(&encrypted.encrypted_key),
                "iv": STANDARD.encode(&encrypted.iv),
                "ciphertext": STANDARD.encode(&encrypted.ciphertext),
                "decrypted": String::from_utf8_lossy(&decrypted),
            }))
        }
        Command::Benchmark { algorithm, text } => {
            let text = read_text(text)?;
            let results = match algorithm {
                Algorithm::Aes => benchmark_aes(
                    &RustCryptoAes,
                    text.as_bytes(),
                    &[AesKeySize::Aes128, AesKeySize::Aes192, AesKeySize::Aes256],
                    config.aes_benchmark_iterations,
                )?,
                Algorithm::Rsa => benchmark_rsa(
                    &RustCryptoRsa,
                    text.as_bytes(),
                    &[1024, 2048, 4096],
                    config.rsa_benchmark_iterations,
                )?,
            };
            print_json(&results)
        }
    }
}

// Shifts outside 0..=25 are rejected here rather than reduced.
fn apply_caesar(direction: Direction, shift: i64, text: &str) -> cryptolab::Result<String> {
    let key = ClassicalKey::Shift(Shift::new(shift)?);
    Ok(match direction {
        Direction::Encrypt => key.encrypt(text),
        Direction::Decrypt => key.decrypt(text),
    })
}

fn key_estimate(ciphertext: &str, length: usize) -> cryptolab::Result<serde_json::Value> {
    let key = estimate_vigenere_key(ciphertext, length);
    let preview: String = vigenere_decrypt(ciphertext, &VigenereKey::new(&key)?)
        .chars()
        .take(PREVIEW_CHARS)
        .collect();
    Ok(json!({ "key": key, "decrypted_preview": preview }))
}

fn aes_key_json(size: AesKeySize) -> serde_json::Value {
    json!({
        "key": STANDARD.encode(RustCryptoAes.generate_key(size)),
        "key_size": size.bits(),
    })
}

/// The text argument, or all of stdin when it is missing.
fn read_text(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            Ok(buf)
        }
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use cryptolab::Error;
    use rstest::rstest;

    #[rstest]
    #[case(-1)]
    #[case(26)]
    #[case(i64::MIN)]
    fn caesar_rejects_out_of_range_shift(#[case] shift: i64) {
        let result = apply_caesar(Direction::Encrypt, shift, "HOLA");

        assert!(matches!(result, Err(Error::InvalidShift(s)) if s == shift));
    }

    #[rstest]
    #[case(Direction::Encrypt, "HOLA", "KROD")]
    #[case(Direction::Decrypt, "KROD", "HOLA")]
    fn caesar_applies_valid_shift(
        #[case] direction: Direction,
        #[case] text: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(apply_caesar(direction, 3, text).unwrap(), expected);
    }

    #[test]
    fn negative_shift_reaches_validation() {
        let cli = Cli::try_parse_from(["cryptolab", "caesar", "encrypt", "--shift", "-3", "HOLA"])
            .unwrap();

        let Command::Caesar { shift, .. } = cli.command else {
            panic!("expected the caesar subcommand");
        };
        assert_eq!(shift, -3);
    }

    #[test]
    fn key_estimate_previews_decrypted_text() {
        let plaintext = include_str!("../../data/quijote.txt");
        let ciphertext = vigenere_encrypt(plaintext, &VigenereKey::new("SOL").unwrap());

        let estimate = key_estimate(&ciphertext, 3).unwrap();

        assert_eq!(estimate["key"], "SOL");
        let preview = estimate["decrypted_preview"].as_str().unwrap();
        assert_eq!(preview.chars().count(), PREVIEW_CHARS);
        assert!(plaintext.starts_with(preview));
    }

    #[test]
    fn key_estimate_of_short_text_has_empty_key() {
        let estimate = key_estimate("AB", 3).unwrap();

        assert_eq!(estimate["key"], "");
        assert_eq!(estimate["decrypted_preview"], "AB");
    }

    #[rstest]
    #[case(AesKeySize::Aes128, 16)]
    #[case(AesKeySize::Aes256, 32)]
    fn generated_aes_key_is_base64(#[case] size: AesKeySize, #[case] bytes: usize) {
        let json = aes_key_json(size);

        let key = STANDARD.decode(json["key"].as_str().unwrap()).unwrap();
        assert_eq!(key.len(), bytes);
        assert_eq!(json["key_size"], bytes * 8);
    }

    #[test]
    fn key_generation_subcommands_parse() {
        let cli = Cli::try_parse_from(["cryptolab", "generate-rsa-keypair", "--bits", "1024"])
            .unwrap();

        assert!(matches!(cli.command, Command::GenerateRsaKeypair { bits: Some(1024) }));
        assert!(Cli::try_parse_from(["cryptolab", "generate-aes-key"]).is_ok());
    }
}
