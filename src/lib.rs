// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! RSA key generation, PEM armoring (with optional password protection),
//! PKCS#1 v1.5 encryption with block chunking, and PSS signatures.
//!
//! All the cryptographic math is delegated to the RustCrypto `rsa` crate; this
//! crate only validates parameters and frames the data.

mod error;
#[cfg(feature = "pem")]
pub mod pem;
pub mod rand;
pub mod rsa;

pub use error::{Error, Result};
