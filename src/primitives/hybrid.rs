// Hybrid encryption: a fresh AES-256 session key encrypts the message in CBC
// mode and RSA-OAEP wraps the session key for the recipient.
use super::{AesCiphertext, AesKeySize, AesMode, AesPrimitive, RsaPadding, RsaPrimitive};
use crate::{Error, Result};

pub const HYBRID_METHOD: &str = "RSA-AES-256-CBC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridCiphertext {
    /// The AES session key, RSA-OAEP encrypted.
    pub encrypted_key: Vec<u8>,
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub method: &'static str,
}

pub fn hybrid_encrypt(
    aes: &impl AesPrimitive,
    rsa: &impl RsaPrimitive,
    public_key_pem: &str,
    plaintext: &[u8],
) -> Result<HybridCiphertext> {
    let session_key = aes.generate_key(AesKeySize::Aes256);
    let encrypted = aes.encrypt(AesMode::Cbc, &session_key, plaintext)?;
    let encrypted_key = rsa.encrypt(public_key_pem, &session_key, RsaPadding::Oaep)?;

    Ok(HybridCiphertext {
        encrypted_key,
        iv: encrypted.iv.ok_or(Error::MissingIv("CBC"))?,
        ciphertext: encrypted.data,
        method: HYBRID_METHOD,
    })
}

pub fn hybrid_decrypt(
    aes: &impl AesPrimitive,
    rsa: &impl RsaPrimitive,
    private_key_pem: &str,
    message: &HybridCiphertext,
) -> Result<Vec<u8>> {
    let session_key = rsa.decrypt(private_key_pem, &message.encrypted_key, RsaPadding::Oaep)?;
    aes.decrypt(
        &session_key,
        &AesCiphertext {
            mode: AesMode::Cbc,
            iv: Some(message.iv.clone()),
            data: message.ciphertext.clone(),
        },
    )
}
