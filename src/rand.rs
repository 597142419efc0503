// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Operating system randomness for salts and IVs.

use crate::error::{Error, Result};

/// fill overwrites the entire buffer with randomness.
pub fn fill(buf: &mut [u8]) -> Result<()> {
    getrandom::fill(buf).map_err(|e| Error::Encoding {
        details: format!("entropy source unavailable: {e}"),
    })
}

/// generate creates an arbitrarily large buffer filled with randomness.
pub fn generate(bytes: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; bytes];
    fill(&mut buf)?;
    Ok(buf)
}
