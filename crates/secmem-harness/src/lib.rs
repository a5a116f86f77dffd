//! Test harness for secure memory key staging.
//!
//! Transform test doubles and a reference model of [`secmem_core::KeyStore`].
//! Nothing in this crate is meant for production: the identity transform
//! stores black keys in the clear.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a lock-free reference implementation of the
//! store. Operations are applied to both the model and the real store, and
//! their results compared.
//!
//! # Fault Injection
//!
//! [`ChaoticTransform`] wraps any transform and fails a seeded, reproducible
//! fraction of calls, so error paths can be driven from property tests and
//! fuzzers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod transforms;

pub use model::{ModelStore, Operation, OperationResult, Target};
pub use transforms::{ChaoticTransform, FailingTransform, IdentityTransform};
