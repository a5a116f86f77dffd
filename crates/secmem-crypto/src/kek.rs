//! KEK-keyed Feistel transform.

use std::fmt;

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use secmem_core::{KeyTransform, TransformError};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::error::KekError;

type HmacSha256 = Hmac<Sha256>;

/// Size of the key-encryption key in bytes.
pub const KEK_SIZE: usize = 32;

/// Number of Feistel rounds
const ROUNDS: usize = 4;

/// Label used for round key derivation
const ROUND_KEY_LABEL: &[u8] = b"secmemBlackV2";

/// Software wrap/unwrap under a key-encryption key.
///
/// Wrapping is a keyed permutation of the whole source: a balanced Feistel
/// network over the two halves, with HMAC-SHA256 as the round function. Only
/// the round keys derived from the KEK are retained.
pub struct KekTransform {
    round_keys: [[u8; 32]; ROUNDS],
}

impl KekTransform {
    /// Create from raw KEK bytes.
    pub fn new(mut kek: [u8; KEK_SIZE]) -> Self {
        let hkdf = Hkdf::<Sha256>::new(None, &kek);
        kek.zeroize();

        let mut round_keys = [[0u8; 32]; ROUNDS];
        for (round, key) in round_keys.iter_mut().enumerate() {
            // Capacity: 13 (label) + 1 (round) = 14
            let mut info = Vec::with_capacity(ROUND_KEY_LABEL.len() + 1);
            info.extend_from_slice(ROUND_KEY_LABEL);
            info.push(round as u8);

            let Ok(()) = hkdf.expand(&info, key) else {
                unreachable!("32 bytes is a valid HKDF-SHA256 output length");
            };
        }

        Self { round_keys }
    }

    /// Create from a slice that must be exactly [`KEK_SIZE`] bytes.
    pub fn from_slice(kek: &[u8]) -> Result<Self, KekError> {
        let Ok(kek) = <[u8; KEK_SIZE]>::try_from(kek) else {
            return Err(KekError::InvalidLength { expected: KEK_SIZE, actual: kek.len() });
        };

        Ok(Self::new(kek))
    }

    /// Create with a fresh KEK from the OS random number generator.
    pub fn generate() -> Result<Self, KekError> {
        let mut kek = [0u8; KEK_SIZE];
        getrandom::fill(&mut kek).map_err(|e| KekError::Entropy(e.to_string()))?;

        let transform = Self::new(kek);
        kek.zeroize();
        Ok(transform)
    }

    /// Run the Feistel network over `source`, forwards or backwards.
    fn permute(&self, source: &[u8], inverse: bool) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        let Ok(len) = u32::try_from(source.len()) else {
            return Err(TransformError::Failed(format!(
                "source of {} bytes exceeds the transform limit",
                source.len()
            )));
        };

        let mut output = Zeroizing::new(source.to_vec());
        let (left, right) = output.split_at_mut(source.len() / 2);

        for step in 0..ROUNDS {
            let round = if inverse { ROUNDS - 1 - step } else { step };
            let key = &self.round_keys[round];

            // Each round only rewrites one half, so replaying rounds in
            // reverse order undoes them.
            if round.is_multiple_of(2) {
                xor_round(key, len, left, right);
            } else {
                xor_round(key, len, right, left);
            }
        }

        Ok(output)
    }
}

/// XOR `target` with HMAC(key, len || counter || input), expanded in 32-byte
/// blocks to the length of `target`.
fn xor_round(key: &[u8; 32], len: u32, input: &[u8], target: &mut [u8]) {
    for (counter, chunk) in target.chunks_mut(32).enumerate() {
        let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
            unreachable!("HMAC-SHA256 accepts any key size");
        };
        mac.update(&len.to_be_bytes());
        mac.update(&(counter as u32).to_be_bytes());
        mac.update(input);
        let block = mac.finalize().into_bytes();

        for (byte, pad) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= pad;
        }
    }
}

impl KeyTransform for KekTransform {
    fn to_black(&self, clear: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        self.permute(clear, false)
    }

    fn to_clear(&self, black: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        self.permute(black, true)
    }
}

impl Drop for KekTransform {
    fn drop(&mut self) {
        self.round_keys.zeroize();
    }
}

impl fmt::Debug for KekTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KekTransform").finish_non_exhaustive()
    }
}
