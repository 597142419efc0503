// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! RSASSA-PSS signing and verification with selectable hash and salt length.
//!
//! https://datatracker.ietf.org/doc/html/rfc8017#section-8.1

use super::{PublicKey, SecretKey};
use crate::error::{Error, Result};
use rsa::Pss;
use rsa::rand_core::OsRng;
use sha2::Digest;
use tracing::trace;

/// HashAlgorithm selects the digest applied to the content before signing,
/// which is also used by the MGF1 mask generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// output_size returns the digest length in bytes.
    pub const fn output_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// digest hashes the content.
    pub fn digest(&self, content: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha1 => sha1::Sha1::digest(content).to_vec(),
            HashAlgorithm::Sha224 => sha2::Sha224::digest(content).to_vec(),
            HashAlgorithm::Sha256 => sha2::Sha256::digest(content).to_vec(),
            HashAlgorithm::Sha384 => sha2::Sha384::digest(content).to_vec(),
            HashAlgorithm::Sha512 => sha2::Sha512::digest(content).to_vec(),
        }
    }

    fn scheme(&self, salt_len: usize) -> Pss {
        match self {
            HashAlgorithm::Sha1 => Pss::new_with_salt::<sha1::Sha1>(salt_len),
            HashAlgorithm::Sha224 => Pss::new_with_salt::<sha2::Sha224>(salt_len),
            HashAlgorithm::Sha256 => Pss::new_with_salt::<sha2::Sha256>(salt_len),
            HashAlgorithm::Sha384 => Pss::new_with_salt::<sha2::Sha384>(salt_len),
            HashAlgorithm::Sha512 => Pss::new_with_salt::<sha2::Sha512>(salt_len),
        }
    }
}

/// SaltLength selects the PSS salt size. Signer and verifier must agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaltLength {
    /// Signs with the largest salt the key and hash permit, and accepts any
    /// salt length when verifying.
    Auto,
    /// A salt as long as the digest.
    EqualsHash,
    /// An explicit, positive number of bytes.
    Fixed(usize),
}

impl SaltLength {
    /// resolve turns the salt selector into a concrete byte count for a key
    /// of the given modulus size. Auto resolves to the maximum.
    fn resolve(self, hash: HashAlgorithm, bits: usize) -> Result<usize> {
        match self {
            SaltLength::Auto => max_salt_len(hash, bits).ok_or_else(|| Error::Signing {
                details: format!("{bits}-bit key too small for PSS with {hash:?}"),
            }),
            SaltLength::EqualsHash => Ok(hash.output_size()),
            SaltLength::Fixed(0) => Err(Error::InvalidParameter {
                details: "fixed salt length must be positive".into(),
            }),
            SaltLength::Fixed(len) => Ok(len),
        }
    }
}

/// Converts the conventional integer encoding of PSS salt lengths: 0 means
/// automatic, -1 means equal to the hash length and positive values are
/// explicit byte counts. Anything else is rejected.
impl TryFrom<i64> for SaltLength {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(SaltLength::Auto),
            -1 => Ok(SaltLength::EqualsHash),
            n if n > 0 => usize::try_from(n)
                .map(SaltLength::Fixed)
                .map_err(|_| Error::InvalidParameter {
                    details: format!("salt length {n} out of range"),
                }),
            n => Err(Error::InvalidParameter {
                details: format!("invalid salt length {n}"),
            }),
        }
    }
}

/// max_salt_len returns the largest salt an encoded message of bits - 1 bits
/// can hold next to the digest, or None if not even an empty salt fits.
fn max_salt_len(hash: HashAlgorithm, bits: usize) -> Option<usize> {
    let em_len = bits.saturating_sub(1).div_ceil(8);
    em_len.checked_sub(hash.output_size() + 2)
}

/// Signature contains an RSASSA-PSS signature, as long as the signing key's
/// modulus in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// from_bytes converts a byte slice into a signature.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// to_bytes converts a signature into a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// as_bytes borrows the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl SecretKey {
    /// sign hashes the content with the given algorithm and creates a PSS
    /// signature over the digest.
    pub fn sign(&self, hash: HashAlgorithm, salt: SaltLength, content: &[u8]) -> Result<Signature> {
        let bits = self.bit_size();

        let salt_len = salt.resolve(hash, bits)?;
        match max_salt_len(hash, bits) {
            Some(max) if salt_len <= max => {}
            max => {
                return Err(Error::Signing {
                    details: format!(
                        "salt length {salt_len} exceeds maximum {} for {bits}-bit key with {hash:?}",
                        max.unwrap_or(0)
                    ),
                });
            }
        }
        let digest = hash.digest(content);

        let mut rng = OsRng;
        let signature = self
            .inner
            .sign_with_rng(&mut rng, hash.scheme(salt_len), &digest)
            .map_err(|e| Error::Signing {
                details: e.to_string(),
            })?;
        Ok(Signature(signature))
    }
}

impl PublicKey {
    /// verify hashes the content with the given algorithm and checks the PSS
    /// signature over the digest. Explicit salt lengths must match the
    /// signer's; Auto accepts any salt length the key can hold.
    pub fn verify(
        &self,
        hash: HashAlgorithm,
        salt: SaltLength,
        content: &[u8],
        signature: &Signature,
    ) -> Result<()> {
        let bits = self.bit_size();
        let max = max_salt_len(hash, bits);

        let digest = hash.digest(content);
        if salt == SaltLength::Auto {
            // Detect the salt length by trying every candidate, longest first
            let max = max.ok_or(Error::VerificationFailed)?;
            return match (0..=max)
                .rev()
                .find(|&len| self.verify_digest(hash, len, &digest, signature))
            {
                Some(len) => {
                    trace!(salt_len = len, "detected PSS salt length");
                    Ok(())
                }
                None => Err(Error::VerificationFailed),
            };
        }
        let salt_len = match salt.resolve(hash, bits) {
            Ok(len) => len,
            Err(err @ Error::InvalidParameter { .. }) => return Err(err),
            Err(_) => return Err(Error::VerificationFailed),
        };
        if max.is_none_or(|max| salt_len > max) {
            return Err(Error::VerificationFailed);
        }
        if !self.verify_digest(hash, salt_len, &digest, signature) {
            return Err(Error::VerificationFailed);
        }
        Ok(())
    }

    fn verify_digest(
        &self,
        hash: HashAlgorithm,
        salt_len: usize,
        digest: &[u8],
        signature: &Signature,
    ) -> bool {
        self.inner
            .verify(hash.scheme(salt_len), digest, signature.as_bytes())
            .is_ok()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::Signature;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    impl Serialize for Signature {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&BASE64.encode(self.as_bytes()))
        }
    }

    impl<'de> Deserialize<'de> for Signature {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            let bytes = BASE64.decode(&s).map_err(de::Error::custom)?;
            if bytes.is_empty() {
                return Err(de::Error::custom("empty signature"));
            }
            Ok(Signature(bytes))
        }
    }
}
