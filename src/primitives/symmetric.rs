// AES in the five classic modes of operation, backed by RustCrypto.
use aes::cipher::{
    block_padding::Pkcs7, AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
    StreamCipher,
};
use rand::{rngs::OsRng, RngCore};

use super::{AesCiphertext, AesKeySize, AesMode, AesPrimitive};
use crate::{Error, Result};

const IV_SIZE: usize = 16;
const CTR_NONCE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoAes;

// Pick the AES variant from the key length and run `$body` with `$cipher`
// aliased to it.
macro_rules! with_aes_cipher {
    ($key:expr, $cipher:ident => $body:expr) => {
        match $key.len() {
            16 => {
                type $cipher = aes::Aes128;
                $body
            }
            24 => {
                type $cipher = aes::Aes192;
                $body
            }
            32 => {
                type $cipher = aes::Aes256;
                $body
            }
            len => Err(Error::InvalidKeyLength(len)),
        }
    };
}

impl AesPrimitive for RustCryptoAes {
    fn generate_key(&self, size: AesKeySize) -> Vec<u8> {
        random_bytes(size.bytes())
    }

    fn encrypt(&self, mode: AesMode, key: &[u8], plaintext: &[u8]) -> Result<AesCiphertext> {
        let iv = match mode {
            AesMode::Ecb => None,
            // 64-bit random nonce followed by a 64-bit block counter.
            AesMode::Ctr => {
                let mut block = random_bytes(CTR_NONCE_SIZE);
                block.resize(IV_SIZE, 0);
                Some(block)
            }
            _ => Some(random_bytes(IV_SIZE)),
        };
        let data = encrypt_with_iv(mode, key, iv.as_deref(), plaintext)?;
        Ok(AesCiphertext { mode, iv, data })
    }

    fn decrypt(&self, key: &[u8], ciphertext: &AesCiphertext) -> Result<Vec<u8>> {
        decrypt_with_iv(
            ciphertext.mode,
            key,
            ciphertext.iv.as_deref(),
            &ciphertext.data,
        )
    }
}

fn encrypt_with_iv(
    mode: AesMode,
    key: &[u8],
    iv: Option<&[u8]>,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    with_aes_cipher!(key, Cipher => {
        let data = match mode {
            AesMode::Ecb => ecb::Encryptor::<Cipher>::new_from_slice(key)
                .map_err(|_| Error::InvalidKeyLength(key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            AesMode::Cbc => cbc::Encryptor::<Cipher>::new_from_slices(key, checked_iv(mode, iv)?)
                .map_err(|_| Error::InvalidKeyLength(key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            AesMode::Cfb => {
                let mut buf = plaintext.to_vec();
                cfb_mode::Encryptor::<Cipher>::new_from_slices(key, checked_iv(mode, iv)?)
                    .map_err(|_| Error::InvalidKeyLength(key.len()))?
                    .encrypt(&mut buf);
                buf
            }
            AesMode::Ofb => {
                let mut buf = plaintext.to_vec();
                ofb::Ofb::<Cipher>::new_from_slices(key, checked_iv(mode, iv)?)
                    .map_err(|_| Error::InvalidKeyLength(key.len()))?
                    .apply_keystream(&mut buf);
                buf
            }
            AesMode::Ctr => {
                let mut buf = plaintext.to_vec();
                ctr::Ctr64BE::<Cipher>::new_from_slices(key, checked_iv(mode, iv)?)
                    .map_err(|_| Error::InvalidKeyLength(key.len()))?
                    .apply_keystream(&mut buf);
                buf
            }
        };
        Ok(data)
    })
}

fn decrypt_with_iv(
    mode: AesMode,
    key: &[u8],
    iv: Option<&[u8]>,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    with_aes_cipher!(key, Cipher => {
        let data = match mode {
            AesMode::Ecb => ecb::Decryptor::<Cipher>::new_from_slice(key)
                .map_err(|_| Error::InvalidKeyLength(key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| Error::Padding)?,
            AesMode::Cbc => cbc::Decryptor::<Cipher>::new_from_slices(key, checked_iv(mode, iv)?)
                .map_err(|_| Error::InvalidKeyLength(key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| Error::Padding)?,
            AesMode::Cfb => {
                let mut buf = ciphertext.to_vec();
                cfb_mode::Decryptor::<Cipher>::new_from_slices(key, checked_iv(mode, iv)?)
                    .map_err(|_| Error::InvalidKeyLength(key.len()))?
                    .decrypt(&mut buf);
                buf
            }
            // Keystream modes are their own inverse.
            AesMode::Ofb | AesMode::Ctr => return encrypt_with_iv(mode, key, iv, ciphertext),
        };
        Ok(data)
    })
}

fn checked_iv(mode: AesMode, iv: Option<&[u8]>) -> Result<&[u8]> {
    match iv {
        Some(iv) if iv.len() == IV_SIZE => Ok(iv),
        Some(iv) => Err(Error::InvalidIvLength {
            mode: mode.name(),
            len: iv.len(),
        }),
        None => Err(Error::MissingIv(mode.name())),
    }
}

pub(crate) fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
