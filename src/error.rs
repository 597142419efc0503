// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

/// Result type used by all rsakit APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type used by all rsakit APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("key generation failed: {details}")]
    KeyGeneration { details: String },
    #[error("invalid key encoding: {details}")]
    InvalidFormat { details: String },
    #[error("decryption failed: {details}")]
    Decryption { details: String },
    #[error("plaintext of {len} bytes exceeds block capacity of {max} bytes")]
    TooLarge { len: usize, max: usize },
    #[error("invalid block size {size}, maximum is {max}")]
    InvalidBlockSize { size: usize, max: usize },
    #[error("ciphertext length {len} is not a multiple of block size {block}")]
    InvalidCiphertextLength { len: usize, block: usize },
    #[error("invalid parameter: {details}")]
    InvalidParameter { details: String },
    #[error("signing failed: {details}")]
    Signing { details: String },
    #[error("signature verification failed")]
    VerificationFailed,
    #[error("encoding failed: {details}")]
    Encoding { details: String },
}
