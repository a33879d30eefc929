//! String and cryptography utilities.
//!
//! AES-256-GCM encryption with Base64 encoding, used for gateway passwords
//! stored in the endpoint configuration file.

use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, AeadCore, KeyInit, Nonce, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::Error;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Master encryption key for AES-256-GCM cipher.
///
/// WARNING: In production, this should come from a keychain or environment
/// variable rather than being hardcoded in the binary.
const MASTER_KEY: &[u8; 32] = b"SbiotConsoleStoredSecretKey2026!";

/// Encrypt a plaintext string with AES-256-GCM.
///
/// A fresh 96-bit nonce is generated per call; the output Base64 string
/// contains `[nonce (12 bytes)][ciphertext]`.
pub fn encrypt(plain_text: &str) -> Result<String> {
    let cipher = Aes256Gcm::new(MASTER_KEY.into());
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plain_text.as_bytes())
        .map_err(|e| Error::Invalid {
            message: format!("Encryption failed: {e}"),
        })?;

    let mut combined = nonce.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(combined))
}

/// Decrypt a Base64 string produced by [`encrypt`]
pub fn decrypt(cipher_text: &str) -> Result<String> {
    let data = BASE64.decode(cipher_text).map_err(|e| Error::Invalid {
        message: format!("Base64 decode failed: {e}"),
    })?;

    // Nonce is the first 12 bytes
    if data.len() < 12 {
        return Err(Error::Invalid {
            message: "Ciphertext too short".to_string(),
        });
    }

    let cipher = Aes256Gcm::new(MASTER_KEY.into());
    let nonce = Nonce::<Aes256Gcm>::from_slice(&data[0..12]);

    let plaintext_bytes = cipher
        .decrypt(nonce, &data[12..])
        .map_err(|e| Error::Invalid {
            message: format!("Decryption failed: {e}"),
        })?;

    String::from_utf8(plaintext_bytes).map_err(|e| Error::Invalid {
        message: format!("UTF-8 decode failed: {e}"),
    })
}
