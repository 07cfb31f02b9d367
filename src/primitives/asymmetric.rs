// RSA encryption with OAEP (SHA-256) or PKCS#1 v1.5 padding, keys exchanged
// as PEM text.
use num_bigint::BigUint;
use rand::thread_rng;
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding},
    sha2::Sha256,
    traits::PublicKeyParts,
    Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey,
};

use super::{RsaKeyPair, RsaPadding, RsaPrimitive, RsaPublicComponents};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoRsa;

impl RsaPrimitive for RustCryptoRsa {
    fn generate_keypair(&self, bits: usize) -> Result<RsaKeyPair> {
        tracing::debug!(bits, "generating RSA key pair");
        let private_key = RsaPrivateKey::new(&mut thread_rng(), bits)?;
        let public_key = private_key.to_public_key();

        let private_key_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| Error::KeyEncoding(e.to_string()))?
            .to_string();
        let public_key_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::KeyEncoding(e.to_string()))?;

        Ok(RsaKeyPair {
            private_key_pem,
            public_key_pem,
            bits,
        })
    }

    fn encrypt(
        &self,
        public_key_pem: &str,
        plaintext: &[u8],
        padding: RsaPadding,
    ) -> Result<Vec<u8>> {
        let key = parse_public_key(public_key_pem)?;
        let max = padding.max_message_len(key.size());
        if plaintext.len() > max {
            return Err(Error::MessageTooLong {
                len: plaintext.len(),
                max,
            });
        }

        let mut rng = thread_rng();
        let ciphertext = match padding {
            RsaPadding::Oaep => key.encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)?,
            RsaPadding::Pkcs1v15 => key.encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)?,
        };
        Ok(ciphertext)
    }

    fn decrypt(
        &self,
        private_key_pem: &str,
        ciphertext: &[u8],
        padding: RsaPadding,
    ) -> Result<Vec<u8>> {
        let key = parse_private_key(private_key_pem)?;
        let plaintext = match padding {
            RsaPadding::Oaep => key.decrypt(Oaep::new::<Sha256>(), ciphertext)?,
            RsaPadding::Pkcs1v15 => key.decrypt(Pkcs1v15Encrypt, ciphertext)?,
        };
        Ok(plaintext)
    }

    fn public_components(&self, public_key_pem: &str) -> Result<RsaPublicComponents> {
        let key = parse_public_key(public_key_pem)?;
        Ok(RsaPublicComponents {
            modulus: BigUint::from_bytes_be(&key.n().to_bytes_be()),
            exponent: BigUint::from_bytes_be(&key.e().to_bytes_be()),
        })
    }
}

// Accept SubjectPublicKeyInfo ("BEGIN PUBLIC KEY") and bare PKCS#1
// ("BEGIN RSA PUBLIC KEY") encodings.
fn parse_public_key(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| Error::KeyEncoding(e.to_string()))
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| Error::KeyEncoding(e.to_string()))
}
