// rsakit: RSA key management and cryptography wrappers
// Copyright 2025 Dark Bio AG. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Demo: key generation, PEM transport, chunked encryption and PSS signing.
//!
//! This example demonstrates:
//! 1. Generating an RSA key pair
//! 2. Exporting it as password protected and public PEM blocks
//! 3. Importing the PEM blocks on the other side
//! 4. Encrypting a payload larger than one RSA block in chunks
//! 5. Signing and verifying the ciphertext
//!
//! Set RUST_LOG=rsakit=trace to see the library's internal events.

use rsakit::rsa::{HashAlgorithm, PublicKey, SaltLength, SecretKey};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // =========================================================================
    // Step 1: Generate the key pair
    // =========================================================================
    println!("1. Generating RSA-1024 key pair...");
    let secret = SecretKey::generate(1024)?;
    println!(
        "   Modulus: {} bits, {} plaintext bytes per {} byte block",
        secret.bit_size(),
        secret.max_plain_bytes(),
        secret.cipher_block_bytes()
    );

    // =========================================================================
    // Step 2: Export the keys as PEM
    // =========================================================================
    println!("\n2. Exporting keys...");
    let secret_pem = secret.to_pem("demo password")?;
    let public_pem = secret.public_key().to_pem()?;
    println!("{secret_pem}");
    println!("{public_pem}");

    // =========================================================================
    // Step 3: Import the keys
    // =========================================================================
    println!("3. Importing keys...");
    let receiver = SecretKey::from_pem(&secret_pem, "demo password")?;
    let sender = PublicKey::from_pem(&public_pem)?;
    println!("   Private key round trip equal: {}", receiver.equal(&secret));

    // =========================================================================
    // Step 4: Chunked encryption
    // =========================================================================
    println!("\n4. Encrypting a 1000 byte payload in 100 byte chunks...");
    let payload = vec![b'x'; 1000];
    let ciphertext = sender.encrypt_chunked(&payload, 100)?;
    println!("   Ciphertext: {} bytes", ciphertext.len());

    let recovered = receiver.decrypt_chunked(&ciphertext)?;
    println!("   Decrypted payload matches: {}", recovered == payload);

    // =========================================================================
    // Step 5: Sign and verify
    // =========================================================================
    println!("\n5. Signing the ciphertext with PSS/SHA-256...");
    let signature = secret.sign(HashAlgorithm::Sha256, SaltLength::EqualsHash, &ciphertext)?;
    println!("   Signature: {}", hex::encode(signature.as_bytes()));

    sender.verify(
        HashAlgorithm::Sha256,
        SaltLength::EqualsHash,
        &ciphertext,
        &signature,
    )?;
    println!("   Signature verified");

    Ok(())
}
