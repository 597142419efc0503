// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! RSA key management wrappers and parametrization.
//!
//! https://datatracker.ietf.org/doc/html/rfc8017

mod pkcs1v15;
mod pss;
#[cfg(all(test, feature = "pem"))]
mod testdata;

pub use pss::{HashAlgorithm, SaltLength, Signature};

use crate::error::{Error, Result};
#[cfg(feature = "pem")]
use crate::pem::{self, Label};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::der::Decode;
use rsa::pkcs8::{EncodePublicKey, SubjectPublicKeyInfoRef};
use rsa::rand_core::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use std::fmt;
use tracing::debug;

/// Number of bytes the PKCS#1 v1.5 encryption padding consumes in each block.
pub const PKCS1V15_OVERHEAD: usize = 11;

/// Largest modulus, in bits, accepted when decoding a public key.
pub const MAX_PUBLIC_KEY_BITS: usize = 16384;

/// SecretKey contains an RSA private key of arbitrary modulus size, usable for
/// PKCS#1 v1.5 decryption and PSS signing.
#[derive(Clone)]
pub struct SecretKey {
    inner: RsaPrivateKey,
}

impl SecretKey {
    /// generate creates a new, random private key with a modulus of the given
    /// bit length and the public exponent 65537.
    pub fn generate(bits: usize) -> Result<SecretKey> {
        let mut rng = OsRng;

        let inner = RsaPrivateKey::new(&mut rng, bits).map_err(|e| Error::KeyGeneration {
            details: e.to_string(),
        })?;
        debug!(bits, "generated RSA key");
        Ok(Self { inner })
    }

    /// from_der parses a PKCS#1 RSAPrivateKey DER buffer into a private key.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = RsaPrivateKey::from_pkcs1_der(der).map_err(|e| Error::InvalidFormat {
            details: e.to_string(),
        })?;
        Ok(Self { inner })
    }

    /// from_pem parses a PEM string into a private key. Encrypted blocks need
    /// the password they were sealed with; for unencrypted blocks the password
    /// is ignored.
    #[cfg(feature = "pem")]
    pub fn from_pem(pem_str: &str, password: &str) -> Result<Self> {
        // Crack open the PEM to get to the private key info
        let block = pem::decode(pem_str, Label::RsaPrivateKey)?;
        if !block.is_encrypted() {
            return Self::from_der(block.contents());
        }
        // A wrong password can still produce valid padding by chance, in
        // which case it's the DER parsing that catches it
        let der = block.decrypt(password.as_bytes())?;
        Self::from_der(&der).map_err(|_| Error::Decryption {
            details: "incorrect PEM password".into(),
        })
    }

    /// to_der serializes a private key into a PKCS#1 RSAPrivateKey DER buffer.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let doc = self.inner.to_pkcs1_der().map_err(|e| Error::Encoding {
            details: e.to_string(),
        })?;
        Ok(doc.as_bytes().to_vec())
    }

    /// to_pem serializes a private key into a PEM string. If the password is
    /// non-empty, the key is encrypted with AES-256-CBC and the parameters are
    /// stored in the Proc-Type and DEK-Info headers.
    #[cfg(feature = "pem")]
    pub fn to_pem(&self, password: &str) -> Result<String> {
        let der = self.to_der()?;
        if password.is_empty() {
            return Ok(pem::encode(Label::RsaPrivateKey, &der));
        }
        debug!(bits = self.bit_size(), "encrypting RSA private key PEM");
        pem::encode_encrypted(Label::RsaPrivateKey, &der, password.as_bytes())
    }

    /// public_key retrieves the public counterpart of the secret key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.to_public_key(),
        }
    }

    /// bit_size returns the bit length of the modulus. It is derived from the
    /// modulus itself, so decoded keys report their true size.
    pub fn bit_size(&self) -> usize {
        self.inner.n().bits()
    }

    /// max_plain_bytes returns the largest plaintext a single PKCS#1 v1.5
    /// block can carry with this key.
    pub fn max_plain_bytes(&self) -> usize {
        self.inner.size().saturating_sub(PKCS1V15_OVERHEAD)
    }

    /// cipher_block_bytes returns the size of every ciphertext block produced
    /// with this key.
    pub fn cipher_block_bytes(&self) -> usize {
        self.inner.size()
    }

    /// equal reports whether both keys share the public exponent, modulus and
    /// private exponent. It is meant for diagnostics and tests, the comparison
    /// is not constant time.
    pub fn equal(&self, other: &SecretKey) -> bool {
        self.inner.e() == other.inner.e()
            && self.inner.n() == other.inner.n()
            && self.inner.d() == other.inner.d()
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for SecretKey {}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("bits", &self.bit_size())
            .finish_non_exhaustive()
    }
}

/// PublicKey contains an RSA public key of arbitrary modulus size, usable for
/// PKCS#1 v1.5 encryption and PSS verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// from_der parses a PKIX SubjectPublicKeyInfo DER buffer into a public key.
    /// Moduli up to MAX_PUBLIC_KEY_BITS are accepted, so any key this crate
    /// can load as a secret key also loads as a public one.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let invalid = |details: String| Error::InvalidFormat { details };

        let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(|e| invalid(e.to_string()))?;
        spki.algorithm
            .assert_algorithm_oid(rsa::pkcs1::ALGORITHM_OID)
            .map_err(|e| invalid(e.to_string()))?;
        let raw = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| invalid("public key bit string is not octet aligned".into()))?;
        let key = rsa::pkcs1::RsaPublicKey::from_der(raw).map_err(|e| invalid(e.to_string()))?;

        let n = BigUint::from_bytes_be(key.modulus.as_bytes());
        let e = BigUint::from_bytes_be(key.public_exponent.as_bytes());
        let inner = RsaPublicKey::new_with_max_size(n, e, MAX_PUBLIC_KEY_BITS)
            .map_err(|err| invalid(err.to_string()))?;
        Ok(Self { inner })
    }

    /// from_pem parses a PEM string into a public key.
    #[cfg(feature = "pem")]
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let block = pem::decode(pem_str, Label::PublicKey)?;
        if block.is_encrypted() {
            return Err(Error::InvalidFormat {
                details: "public key PEM must not be encrypted".into(),
            });
        }
        Self::from_der(block.contents())
    }

    /// to_der serializes a public key into a PKIX SubjectPublicKeyInfo DER buffer.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let doc = self.inner.to_public_key_der().map_err(|e| Error::Encoding {
            details: e.to_string(),
        })?;
        Ok(doc.as_bytes().to_vec())
    }

    /// to_pem serializes a public key into a PEM string.
    #[cfg(feature = "pem")]
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem::encode(Label::PublicKey, &self.to_der()?))
    }

    /// bit_size returns the bit length of the modulus.
    pub fn bit_size(&self) -> usize {
        self.inner.n().bits()
    }

    /// max_plain_bytes returns the largest plaintext a single PKCS#1 v1.5
    /// block can carry with this key.
    pub fn max_plain_bytes(&self) -> usize {
        self.inner.size().saturating_sub(PKCS1V15_OVERHEAD)
    }

    /// cipher_block_bytes returns the size of every ciphertext block produced
    /// with this key.
    pub fn cipher_block_bytes(&self) -> usize {
        self.inner.size()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::PublicKey;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};

    impl Serialize for PublicKey {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let der = self.to_der().map_err(ser::Error::custom)?;
            serializer.serialize_str(&BASE64.encode(der))
        }
    }

    impl<'de> Deserialize<'de> for PublicKey {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            let bytes = BASE64.decode(&s).map_err(de::Error::custom)?;
            PublicKey::from_der(&bytes).map_err(de::Error::custom)
        }
    }
}
