// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! PKCS#1 v1.5 encryption, single block and chunked.
//!
//! Chunked ciphertext is a flat concatenation of fixed size blocks, one per
//! plaintext chunk, with no header. Block i lives at offset i * k, where k is
//! the modulus size in bytes; the decrypting key determines k.

use super::{PublicKey, SecretKey};
use crate::error::{Error, Result};
use rsa::Pkcs1v15Encrypt;
use rsa::rand_core::OsRng;
use tracing::trace;

impl PublicKey {
    /// encrypt seals the plaintext into a single PKCS#1 v1.5 block. Every call
    /// draws fresh padding, so equal plaintexts yield different ciphertexts.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let max = self.max_plain_bytes();
        if plaintext.len() > max {
            return Err(Error::TooLarge {
                len: plaintext.len(),
                max,
            });
        }
        let mut rng = OsRng;
        self.inner
            .encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)
            .map_err(|e| match e {
                rsa::Error::MessageTooLong => Error::TooLarge {
                    len: plaintext.len(),
                    max,
                },
                e => Error::Encoding {
                    details: e.to_string(),
                },
            })
    }

    /// encrypt_chunked splits the plaintext into chunks of at most chunk_size
    /// bytes and seals each into its own block. Plaintexts fitting into one
    /// block are sealed with a plain encrypt call.
    pub fn encrypt_chunked(&self, plaintext: &[u8], chunk_size: usize) -> Result<Vec<u8>> {
        let max = self.max_plain_bytes();
        if chunk_size == 0 || chunk_size > max {
            return Err(Error::InvalidBlockSize {
                size: chunk_size,
                max,
            });
        }
        if plaintext.len() <= max {
            return self.encrypt(plaintext);
        }
        let stride = self.cipher_block_bytes();
        let chunks = plaintext.len().div_ceil(chunk_size);

        let mut ciphertext = vec![0u8; chunks * stride];
        for (chunk, block) in plaintext
            .chunks(chunk_size)
            .zip(ciphertext.chunks_exact_mut(stride))
        {
            let sealed = self.encrypt(chunk)?;
            block[..sealed.len()].copy_from_slice(&sealed);
        }
        trace!(chunks, stride, "encrypted chunked payload");
        Ok(ciphertext)
    }
}

impl SecretKey {
    /// encrypt seals the plaintext with the public half of the key. See
    /// [`PublicKey::encrypt`].
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.public_key().encrypt(plaintext)
    }

    /// encrypt_chunked seals the plaintext with the public half of the key. See
    /// [`PublicKey::encrypt_chunked`].
    pub fn encrypt_chunked(&self, plaintext: &[u8], chunk_size: usize) -> Result<Vec<u8>> {
        self.public_key().encrypt_chunked(plaintext, chunk_size)
    }

    /// decrypt opens a single PKCS#1 v1.5 block.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut rng = OsRng;
        self.inner
            .decrypt_blinded(&mut rng, Pkcs1v15Encrypt, ciphertext)
            .map_err(|e| Error::Decryption {
                details: e.to_string(),
            })
    }

    /// decrypt_chunked opens a ciphertext produced by encrypt_chunked, walking
    /// it in fixed strides of the key's block size and concatenating the
    /// recovered chunks in order.
    pub fn decrypt_chunked(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let stride = self.cipher_block_bytes();
        if ciphertext.len() % stride != 0 {
            return Err(Error::InvalidCiphertextLength {
                len: ciphertext.len(),
                block: stride,
            });
        }
        if ciphertext.len() <= stride {
            return self.decrypt(ciphertext);
        }
        let chunks = ciphertext.len() / stride;

        let mut plaintext = Vec::with_capacity(chunks * self.max_plain_bytes());
        for block in ciphertext.chunks_exact(stride) {
            plaintext.extend_from_slice(&self.decrypt(block)?);
        }
        trace!(chunks, stride, "decrypted chunked payload");
        Ok(plaintext)
    }
}
