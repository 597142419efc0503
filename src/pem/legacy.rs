// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Legacy OpenSSL PEM encryption (Proc-Type: 4,ENCRYPTED / DEK-Info).
//!
//! The key is derived with EVP_BytesToKey: MD5, a single iteration, and the
//! first 8 bytes of the IV as salt. The payload is PKCS#7 padded and encrypted
//! in CBC mode. Blocks are always written with AES-256-CBC; the AES and DES
//! families are accepted on read, covering what `openssl genrsa -des3` and
//! friends produce. This format is weak against password guessing and only
//! exists for interoperability with traditional RSA key files.

use crate::error::{Error, Result};
use crate::rand;
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use des::{Des, TdesEde3};
use md5::{Digest, Md5};
use pem::Pem;

const PROC_TYPE: &str = "Proc-Type";
pub(super) const DEK_INFO: &str = "DEK-Info";

const AES_BLOCK_SIZE: usize = 16;
const DES_BLOCK_SIZE: usize = 8;
const SALT_SIZE: usize = 8;

/// Symmetric ciphers understood in the DEK-Info header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cipher {
    DesCbc,
    DesEde3Cbc,
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
}

impl Cipher {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "DES-CBC" => Some(Cipher::DesCbc),
            "DES-EDE3-CBC" => Some(Cipher::DesEde3Cbc),
            "AES-128-CBC" => Some(Cipher::Aes128Cbc),
            "AES-192-CBC" => Some(Cipher::Aes192Cbc),
            "AES-256-CBC" => Some(Cipher::Aes256Cbc),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Cipher::DesCbc => "DES-CBC",
            Cipher::DesEde3Cbc => "DES-EDE3-CBC",
            Cipher::Aes128Cbc => "AES-128-CBC",
            Cipher::Aes192Cbc => "AES-192-CBC",
            Cipher::Aes256Cbc => "AES-256-CBC",
        }
    }

    fn key_size(&self) -> usize {
        match self {
            Cipher::DesCbc => 8,
            Cipher::DesEde3Cbc => 24,
            Cipher::Aes128Cbc => 16,
            Cipher::Aes192Cbc => 24,
            Cipher::Aes256Cbc => 32,
        }
    }

    /// block_size is also the IV size in CBC mode.
    fn block_size(&self) -> usize {
        match self {
            Cipher::DesCbc | Cipher::DesEde3Cbc => DES_BLOCK_SIZE,
            Cipher::Aes128Cbc | Cipher::Aes192Cbc | Cipher::Aes256Cbc => AES_BLOCK_SIZE,
        }
    }
}

/// encrypt seals data under the password with AES-256-CBC and returns a PEM
/// block carrying the encryption headers.
pub(super) fn encrypt(label: &str, data: &[u8], password: &[u8]) -> Result<Pem> {
    let cipher = Cipher::Aes256Cbc;

    let mut iv = [0u8; AES_BLOCK_SIZE];
    rand::fill(&mut iv)?;
    let key = derive_key(password, &iv[..SALT_SIZE], cipher.key_size());

    let sealed = cbc::Encryptor::<Aes256>::new_from_slices(&key, &iv)
        .map_err(|e| Error::Encoding {
            details: e.to_string(),
        })?
        .encrypt_padded_vec_mut::<Pkcs7>(data);

    let info = format!("{},{}", cipher.name(), hex::encode(iv));

    let mut block = Pem::new(label, sealed);
    for (key, value) in [(PROC_TYPE, "4,ENCRYPTED"), (DEK_INFO, info.as_str())] {
        block
            .headers_mut()
            .add(key, value)
            .map_err(|e| Error::Encoding {
                details: e.to_string(),
            })?;
    }
    Ok(block)
}

/// decrypt opens an encrypted PEM block with the password. Malformed headers
/// are reported as format errors, a padding mismatch as a decryption error.
pub(super) fn decrypt(block: &Pem, password: &[u8]) -> Result<Vec<u8>> {
    let info = block.headers().get(DEK_INFO).ok_or_else(|| Error::InvalidFormat {
        details: "missing DEK-Info header".into(),
    })?;
    let (name, iv_hex) = info.split_once(',').ok_or_else(|| Error::InvalidFormat {
        details: format!("malformed DEK-Info header {info}"),
    })?;
    let cipher = Cipher::from_name(name.trim()).ok_or_else(|| Error::InvalidFormat {
        details: format!("unsupported PEM cipher {name}"),
    })?;
    let iv = hex::decode(iv_hex.trim()).map_err(|e| Error::InvalidFormat {
        details: format!("malformed DEK-Info IV: {e}"),
    })?;
    let block_size = cipher.block_size();
    if iv.len() != block_size {
        return Err(Error::InvalidFormat {
            details: format!(
                "DEK-Info IV for {} must be {block_size} bytes, got {}",
                cipher.name(),
                iv.len()
            ),
        });
    }
    let data = block.contents();
    if data.is_empty() || data.len() % block_size != 0 {
        return Err(Error::InvalidFormat {
            details: "encrypted PEM data is not a multiple of the block size".into(),
        });
    }
    let key = derive_key(password, &iv[..SALT_SIZE], cipher.key_size());

    match cipher {
        Cipher::DesCbc => open::<cbc::Decryptor<Des>>(&key, &iv, data),
        Cipher::DesEde3Cbc => open::<cbc::Decryptor<TdesEde3>>(&key, &iv, data),
        Cipher::Aes128Cbc => open::<cbc::Decryptor<Aes128>>(&key, &iv, data),
        Cipher::Aes192Cbc => open::<cbc::Decryptor<Aes192>>(&key, &iv, data),
        Cipher::Aes256Cbc => open::<cbc::Decryptor<Aes256>>(&key, &iv, data),
    }
}

fn open<D: KeyIvInit + BlockDecryptMut>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    D::new_from_slices(key, iv)
        .map_err(|e| Error::Decryption {
            details: e.to_string(),
        })?
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| Error::Decryption {
            details: "incorrect PEM password".into(),
        })
}

/// derive_key implements OpenSSL's EVP_BytesToKey with MD5 and one iteration:
/// D_i = MD5(D_{i-1} || password || salt), concatenated until long enough.
fn derive_key(password: &[u8], salt: &[u8], len: usize) -> Vec<u8> {
    let mut key = Vec::with_capacity(len + 16);
    let mut digest: Vec<u8> = Vec::new();
    while key.len() < len {
        let mut hasher = Md5::new();
        hasher.update(&digest);
        hasher.update(password);
        hasher.update(salt);
        digest = hasher.finalize().to_vec();
        key.extend_from_slice(&digest);
    }
    key.truncate(len);
    key
}
