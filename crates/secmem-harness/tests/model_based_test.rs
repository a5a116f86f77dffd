//! Model-based property tests.
//!
//! Random operation sequences are applied to both [`ModelStore`] and a real
//! [`KeyStore`]; every result and the final stored bytes must agree.
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!      ModelStore      KeyStore        Compare
//!      (reference)     (real)          Results
//! ```

use proptest::prelude::*;
use secmem_core::{KEY_CAPACITY, KeyStore, Resource};
use secmem_crypto::KekTransform;
use secmem_harness::{
    ChaoticTransform, IdentityTransform, ModelStore, Operation, OperationResult, Target,
};

fn target_strategy() -> impl Strategy<Value = Target> {
    prop_oneof![Just(Target::Clear), Just(Target::Black)]
}

/// Offsets and lengths straddle the 32-byte capacity.
fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (target_strategy(), 0u8..40, prop::collection::vec(any::<u8>(), 0..40))
            .prop_map(|(target, offset, data)| Operation::Write { target, offset, data }),
        (target_strategy(), 0u8..40, 0u8..40)
            .prop_map(|(target, offset, max_len)| Operation::Read { target, offset, max_len }),
    ]
}

fn assert_stored_match<T: secmem_core::KeyTransform>(
    model: &ModelStore<T>,
    store: &KeyStore,
) -> Result<(), TestCaseError> {
    for resource in Resource::ALL {
        prop_assert_eq!(model.stored(resource), &store.stored(resource)[..]);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: identity-backed store behaves exactly like the model
    #[test]
    fn prop_identity_store_matches_model(
        ops in prop::collection::vec(operation_strategy(), 1..64),
    ) {
        let store = KeyStore::new(IdentityTransform);
        let mut model = ModelStore::new(KEY_CAPACITY, IdentityTransform);

        for op in &ops {
            let real = op.apply_to(&store);
            let expected = model.apply(op);
            prop_assert_eq!(real, expected, "diverged on {:?}", op);
        }

        assert_stored_match(&model, &store)?;
    }

    /// Property: KEK-backed store behaves exactly like the model
    #[test]
    fn prop_kek_store_matches_model(
        kek in any::<[u8; 32]>(),
        ops in prop::collection::vec(operation_strategy(), 1..64),
    ) {
        let store = KeyStore::new(KekTransform::new(kek));
        let mut model = ModelStore::new(KEY_CAPACITY, KekTransform::new(kek));

        for op in &ops {
            prop_assert_eq!(op.apply_to(&store), model.apply(op), "diverged on {:?}", op);
        }

        assert_stored_match(&model, &store)?;
    }

    /// Property: injected transform failures surface identically and never
    /// disturb stored bytes
    #[test]
    fn prop_chaotic_store_matches_model(
        seed in any::<u64>(),
        failure_rate in 0.0..0.8,
        ops in prop::collection::vec(operation_strategy(), 1..64),
    ) {
        // Same seed on both sides: each read consumes one roll on each
        let store = KeyStore::new(ChaoticTransform::with_seed(IdentityTransform, failure_rate, seed));
        let mut model = ModelStore::new(
            KEY_CAPACITY,
            ChaoticTransform::with_seed(IdentityTransform, failure_rate, seed),
        );

        for op in &ops {
            prop_assert_eq!(op.apply_to(&store), model.apply(op), "diverged on {:?}", op);
        }

        assert_stored_match(&model, &store)?;
    }

    /// Property: a successful write never affects a read of the same resource
    #[test]
    fn prop_write_never_visible_through_same_resource(
        target in target_strategy(),
        offset in 0u8..32,
        data in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        let store = KeyStore::new(IdentityTransform);
        let read = Operation::Read { target, offset: 0, max_len: 32 };

        let before = read.apply_to(&store);
        let write = Operation::Write { target, offset, data };
        let _ = write.apply_to(&store);
        let after = read.apply_to(&store);

        prop_assert_eq!(before, after);
    }
}

#[test]
fn shadowing_example_matches_model() {
    let store = KeyStore::new(IdentityTransform);
    let mut model = ModelStore::new(KEY_CAPACITY, IdentityTransform);

    let ops = [
        Operation::Write { target: Target::Clear, offset: 0, data: vec![1, 2, 3] },
        Operation::Read { target: Target::Clear, offset: 0, max_len: 3 },
        Operation::Read { target: Target::Black, offset: 0, max_len: 3 },
    ];

    let results: Vec<OperationResult> = ops.iter().map(|op| op.apply_to(&store)).collect();
    let expected: Vec<OperationResult> = ops.iter().map(|op| model.apply(op)).collect();

    assert_eq!(results, expected);
    assert_eq!(
        results,
        vec![
            OperationResult::Written(3),
            OperationResult::Read(vec![0, 0, 0]),
            OperationResult::Read(vec![1, 2, 3]),
        ]
    );
}
