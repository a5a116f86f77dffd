//! Secure Memory Software Transform
//!
//! A software stand-in for a hardware key-wrapping engine. A 32-byte
//! key-encryption key (KEK) is expanded with HKDF-SHA256 into four round keys,
//! and the source is wrapped by a four-round Feistel network over its two
//! halves with HMAC-SHA256 as the round function.
//!
//! ```text
//! KEK ──► HKDF-SHA256(info = label || round) ──► k0 k1 k2 k3
//!
//! to_black:  R ^= F(k0, L)   L ^= F(k1, R)   R ^= F(k2, L)   L ^= F(k3, R)
//! to_clear:  the same rounds in reverse order
//!
//! F(k, x) = HMAC-SHA256(k, len || counter || x), expanded to the half length
//! ```
//!
//! # Properties
//!
//! - Length preserving: output is exactly as long as the input
//! - Round trip: `to_clear(to_black(x)) == x`
//! - Deterministic for a fixed KEK
//! - Different KEKs produce unrelated black values
//! - A change anywhere in the clear key changes both halves of the black key
//!
//! # Security
//!
//! The wrap is a keyed permutation, not a keystream: knowing the black value
//! of one key (for example the all-zero key of a fresh store) reveals nothing
//! that unwraps another. It is deterministic, so equal clear keys wrap to
//! equal black keys under one KEK. Only the derived round keys are retained,
//! and they are zeroized on drop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod kek;

pub use error::KekError;
pub use kek::{KEK_SIZE, KekTransform};
