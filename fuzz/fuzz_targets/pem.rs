// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rsakit::pem::{self, Label};
use rsakit::rsa::{PublicKey, SecretKey};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // Armor parsing must never panic, whatever the label or headers
    for label in [Label::RsaPrivateKey, Label::PublicKey] {
        if let Ok(block) = pem::decode(input, label) {
            let _ = block.decrypt(b"fuzz");

            // Re-armoring an unencrypted block must parse back to the same bytes
            if !block.is_encrypted() {
                let encoded = pem::encode(label, block.contents());
                let decoded = pem::decode(&encoded, label).unwrap();
                assert_eq!(decoded.contents(), block.contents());
            }
        }
    }
    // Key decoding must fail gracefully on garbage
    let _ = SecretKey::from_pem(input, "fuzz");
    let _ = PublicKey::from_pem(input);
});
