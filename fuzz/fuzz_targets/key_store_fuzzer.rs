//! Fuzz target for KeyStore bounds and read derivation
//!
//! Applies arbitrary write/read sequences to a KEK-backed KeyStore and to the
//! reference ModelStore.
//!
//! # Invariants
//!
//! - KeyStore NEVER panics on any offset or length
//! - Every result matches the model (bounds, EOF, clamping, shadowing)
//! - Reads never return more than the buffer capacity
//! - Stored bytes match the model after the sequence

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use secmem_core::{KEY_CAPACITY, KeyStore, Resource};
use secmem_crypto::KekTransform;
use secmem_harness::{ModelStore, Operation, OperationResult};

#[derive(Debug, Clone, Arbitrary)]
struct Scenario {
    kek: [u8; 32],
    operations: Vec<Operation>,
}

fuzz_target!(|scenario: Scenario| {
    let store = KeyStore::new(KekTransform::new(scenario.kek));
    let mut model = ModelStore::new(KEY_CAPACITY, KekTransform::new(scenario.kek));

    for op in &scenario.operations {
        let real = op.apply_to(&store);
        let expected = model.apply(op);
        assert_eq!(real, expected, "diverged on {op:?}");

        if let OperationResult::Read(bytes) = &real {
            assert!(bytes.len() <= KEY_CAPACITY);
        }
    }

    for resource in Resource::ALL {
        assert_eq!(&store.stored(resource)[..], model.stored(resource));
    }
});
