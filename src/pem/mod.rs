// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! PEM armoring with strict marker validation and optional legacy encryption.
//!
//! https://datatracker.ietf.org/doc/html/rfc1421

mod legacy;

use crate::error::{Error, Result};
use pem::{EncodeConfig, LineEnding, Pem};
use std::fmt;
use tracing::trace;

const PEM_HEADER: &str = "-----BEGIN ";
const PEM_FOOTER: &str = "-----END ";
const PEM_ENDING: &str = "-----";

/// Label is the type string carried in a PEM block's BEGIN/END markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// PKCS#1 RSAPrivateKey, optionally encrypted.
    RsaPrivateKey,
    /// PKIX SubjectPublicKeyInfo.
    PublicKey,
}

impl Label {
    /// as_str returns the literal marker text of the label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Label::RsaPrivateKey => "RSA PRIVATE KEY",
            Label::PublicKey => "PUBLIC KEY",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block is a parsed PEM block whose label already matched the expected one.
#[derive(Debug, Clone)]
pub struct Block {
    inner: Pem,
}

impl Block {
    /// label returns the type label of the block.
    pub fn label(&self) -> &str {
        self.inner.tag()
    }

    /// is_encrypted reports whether the block carries legacy encryption headers.
    pub fn is_encrypted(&self) -> bool {
        self.inner.headers().get(legacy::DEK_INFO).is_some()
    }

    /// contents returns the raw (possibly still encrypted) block payload.
    pub fn contents(&self) -> &[u8] {
        self.inner.contents()
    }

    /// decrypt returns the plaintext payload of the block. Unencrypted blocks
    /// are returned as is and the password is ignored; encrypted ones require
    /// a non-empty password.
    pub fn decrypt(&self, password: &[u8]) -> Result<Vec<u8>> {
        if !self.is_encrypted() {
            return Ok(self.inner.contents().to_vec());
        }
        if password.is_empty() {
            return Err(Error::Decryption {
                details: "PEM block is encrypted but no password was given".into(),
            });
        }
        legacy::decrypt(&self.inner, password)
    }
}

/// decode parses a single PEM block and checks that it carries the expected
/// label. Leading and trailing whitespace is ignored, but the BEGIN and END
/// markers must be on their own lines and nothing else may surround them.
pub fn decode(input: &str, label: Label) -> Result<Block> {
    let input = input.trim();

    let mut lines = input.lines();
    let first = lines.next().unwrap_or_default();
    let last = lines.next_back().unwrap_or_default();

    if !first.starts_with(PEM_HEADER) || !first.ends_with(PEM_ENDING) {
        return Err(Error::InvalidFormat {
            details: "PEM BEGIN marker must be on its own line".into(),
        });
    }
    if !last.starts_with(PEM_FOOTER) || !last.ends_with(PEM_ENDING) {
        return Err(Error::InvalidFormat {
            details: "PEM END marker must be on its own line".into(),
        });
    }
    let inner = pem::parse(input).map_err(|e| Error::InvalidFormat {
        details: e.to_string(),
    })?;
    if inner.tag() != label.as_str() {
        return Err(Error::InvalidFormat {
            details: format!("invalid PEM tag {}", inner.tag()),
        });
    }
    Ok(Block { inner })
}

/// encode armors data as an unencrypted PEM block. Lines are 64 characters,
/// using \n line endings.
pub fn encode(label: Label, data: &[u8]) -> String {
    pem::encode_config(&Pem::new(label.as_str(), data), config())
}

/// encode_encrypted armors data as a PEM block encrypted with AES-256-CBC
/// under a key derived from the password, storing the parameters in the
/// Proc-Type and DEK-Info headers.
pub fn encode_encrypted(label: Label, data: &[u8], password: &[u8]) -> Result<String> {
    let block = legacy::encrypt(label.as_str(), data, password)?;
    trace!(%label, "armored encrypted PEM block");
    Ok(pem::encode_config(&block, config()))
}

fn config() -> EncodeConfig {
    EncodeConfig::new().set_line_ending(LineEnding::LF)
}
