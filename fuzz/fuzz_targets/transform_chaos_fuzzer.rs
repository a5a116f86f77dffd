//! Fuzz target for KeyStore under transform failures
//!
//! Wraps the transform in ChaoticTransform to inject failures at a
//! configurable rate.
//!
//! # Strategy
//!
//! - Failure rates from 0% to 90%
//! - Arbitrary write/read sequences under failure pressure
//!
//! # Invariants
//!
//! - Transform failures surface as ErrorKind::Transform, never panics
//! - A failed read returns no bytes
//! - Writes never invoke the transform and are unaffected by failures
//! - After a failure, the next successful read reflects current state

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use secmem_core::{ErrorKind, KEY_CAPACITY, KeyStore};
use secmem_harness::{
    ChaoticTransform, IdentityTransform, ModelStore, Operation, OperationResult,
};

#[derive(Debug, Clone, Arbitrary)]
struct ChaosScenario {
    /// Seed for ChaoticTransform RNG (deterministic failures)
    chaos_seed: u64,
    /// Failure rate 0-9 maps to 0%-90%
    failure_rate_tenth: u8,
    operations: Vec<Operation>,
}

fuzz_target!(|scenario: ChaosScenario| {
    let failure_rate = f64::from(scenario.failure_rate_tenth % 10) / 10.0;

    let transform = ChaoticTransform::with_seed(IdentityTransform, failure_rate, scenario.chaos_seed);
    let store = KeyStore::new(transform.clone());
    let mut model = ModelStore::new(
        KEY_CAPACITY,
        ChaoticTransform::with_seed(IdentityTransform, failure_rate, scenario.chaos_seed),
    );

    let mut reads = 0usize;
    for op in &scenario.operations {
        let real = op.apply_to(&store);
        assert_eq!(real, model.apply(op), "diverged on {op:?}");

        match op {
            Operation::Read { .. } => {
                reads += 1;
                assert!(matches!(
                    real,
                    OperationResult::Read(_) | OperationResult::Failed(ErrorKind::Transform)
                ));
            },
            Operation::Write { .. } => {
                assert!(!matches!(real, OperationResult::Failed(ErrorKind::Transform)));
            },
        }
    }

    // One transform call per read, none per write
    assert_eq!(transform.call_count(), reads);
});
