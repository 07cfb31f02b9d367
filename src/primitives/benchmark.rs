// Wall-clock timings of AES and RSA over a range of key sizes.
use std::time::{Duration, Instant};

use serde::Serialize;

use super::{AesKeySize, AesMode, AesPrimitive, RsaPadding, RsaPrimitive};
use crate::Result;

/// RSA can only encrypt short messages, so longer inputs are cut to this
/// (or to what the key can hold, if less).
pub const RSA_BENCHMARK_BYTES: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub key_size: usize,
    /// Average time of one operation, in milliseconds.
    pub encrypt_time_ms: f64,
    pub decrypt_time_ms: f64,
    pub total_time_ms: f64,
}

impl BenchmarkResult {
    fn new(key_size: usize, encrypt: Duration, decrypt: Duration, iterations: u32) -> Self {
        let encrypt_time_ms = encrypt.as_secs_f64() * 1000.0 / iterations as f64;
        let decrypt_time_ms = decrypt.as_secs_f64() * 1000.0 / iterations as f64;
        BenchmarkResult {
            key_size,
            encrypt_time_ms,
            decrypt_time_ms,
            total_time_ms: encrypt_time_ms + decrypt_time_ms,
        }
    }
}

/// Time AES-CBC encryption and decryption of `plaintext` for each key size.
pub fn benchmark_aes(
    aes: &impl AesPrimitive,
    plaintext: &[u8],
    sizes: &[AesKeySize],
    iterations: u32,
) -> Result<Vec<BenchmarkResult>> {
    let iterations = iterations.max(1);
    sizes
        .iter()
        .map(|&size| {
            let key = aes.generate_key(size);

            let start = Instant::now();
            for _ in 0..iterations {
                aes.encrypt(AesMode::Cbc, &key, plaintext)?;
            }
            let encrypt = start.elapsed();

            let ciphertext = aes.encrypt(AesMode::Cbc, &key, plaintext)?;
            let start = Instant::now();
            for _ in 0..iterations {
                aes.decrypt(&key, &ciphertext)?;
            }
            let decrypt = start.elapsed();

            tracing::debug!(bits = size.bits(), ?encrypt, ?decrypt, "AES benchmark");
            Ok(BenchmarkResult::new(size.bits(), encrypt, decrypt, iterations))
        })
        .collect()
}

/// Time RSA-OAEP encryption and decryption for each key size. Key
/// generation is not part of the measurement.
pub fn benchmark_rsa(
    rsa: &impl RsaPrimitive,
    plaintext: &[u8],
    key_bits: &[usize],
    iterations: u32,
) -> Result<Vec<BenchmarkResult>> {
    let iterations = iterations.max(1);
    key_bits
        .iter()
        .map(|&bits| {
            let keypair = rsa.generate_keypair(bits)?;
            let limit = RSA_BENCHMARK_BYTES.min(RsaPadding::Oaep.max_message_len(bits / 8));
            let message = &plaintext[..plaintext.len().min(limit)];

            let start = Instant::now();
            for _ in 0..iterations {
                rsa.encrypt(&keypair.public_key_pem, message, RsaPadding::Oaep)?;
            }
            let encrypt = start.elapsed();

            let ciphertext = rsa.encrypt(&keypair.public_key_pem, message, RsaPadding::Oaep)?;
            let start = Instant::now();
            for _ in 0..iterations {
                rsa.decrypt(&keypair.private_key_pem, &ciphertext, RsaPadding::Oaep)?;
            }
            let decrypt = start.elapsed();

            tracing::debug!(bits, ?encrypt, ?decrypt, "RSA benchmark");
            Ok(BenchmarkResult::new(bits, encrypt, decrypt, iterations))
        })
        .collect()
}
