// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM with a fresh random nonce per message.

use barberbook_core::BarberError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;

/// Ciphertext with its authentication tag, plus the nonce used to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
}

fn aead_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, BarberError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| BarberError::Vault("invalid AES-256-GCM key".into()))?;
    Ok(LessSafeKey::new(unbound))
}

fn fill_random(buf: &mut [u8]) -> Result<(), BarberError> {
    SystemRandom::new()
        .fill(buf)
        .map_err(|_| BarberError::Vault("system random source unavailable".into()))
}

pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Sealed, BarberError> {
    let key = aead_key(key)?;
    let mut nonce = [0u8; NONCE_LEN];
    fill_random(&mut nonce)?;

    let mut ciphertext = plaintext.to_vec();
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut ciphertext)
        .map_err(|_| BarberError::Vault("encryption failed".into()))?;
    Ok(Sealed { ciphertext, nonce })
}

/// Decrypt and authenticate. Fails on a wrong key or tampered data.
pub fn open(key: &[u8; KEY_LEN], sealed: &Sealed) -> Result<Zeroizing<Vec<u8>>, BarberError> {
    let key = aead_key(key)?;
    let mut buf = Zeroizing::new(sealed.ciphertext.clone());
    let plaintext = key
        .open_in_place(
            Nonce::assume_unique_for_key(sealed.nonce),
            Aad::empty(),
            buf.as_mut_slice(),
        )
        .map_err(|_| BarberError::Vault("decryption failed, wrong key or corrupted data".into()))?;
    Ok(Zeroizing::new(plaintext.to_vec()))
}

pub fn random_key() -> Result<Zeroizing<[u8; KEY_LEN]>, BarberError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    fill_random(key.as_mut_slice())?;
    Ok(key)
}
