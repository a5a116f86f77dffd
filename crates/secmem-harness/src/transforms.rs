//! Transform test doubles.

#![allow(clippy::disallowed_types, reason = "Locking simple RNG state")]

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use secmem_core::{KeyTransform, TransformError};
use zeroize::Zeroizing;

/// Identity copy in both directions.
///
/// The reference stub behavior: black equals clear. Test double only.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl KeyTransform for IdentityTransform {
    fn to_black(&self, clear: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        Ok(Zeroizing::new(clear.to_vec()))
    }

    fn to_clear(&self, black: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        Ok(Zeroizing::new(black.to_vec()))
    }
}

/// Fails every call with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingTransform {
    error: TransformError,
}

impl FailingTransform {
    /// Fail every call with `error`.
    pub fn new(error: TransformError) -> Self {
        Self { error }
    }

    /// Fail every call as if the backing device were absent.
    pub fn unavailable() -> Self {
        Self::new(TransformError::Unavailable("secure memory unavailable".to_string()))
    }
}

impl KeyTransform for FailingTransform {
    fn to_black(&self, _clear: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        Err(self.error.clone())
    }

    fn to_clear(&self, _black: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        Err(self.error.clone())
    }
}

/// Transform wrapper that randomly injects failures.
///
/// Delegates to an inner transform but fails a fraction of calls given by
/// `failure_rate`. Failures are drawn from a seeded LCG so chaos runs are
/// reproducible. Clones share the RNG and the call counter.
#[derive(Clone)]
pub struct ChaoticTransform<T: KeyTransform> {
    inner: T,
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    rng: Arc<Mutex<ChaoticRng>>,
    calls: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
}

/// Linear congruential generator for deterministic chaos.
struct ChaoticRng {
    state: u64,
}

impl ChaoticRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next value in [0.0, 1.0)
    fn next_f64(&mut self) -> f64 {
        // LCG constants from Numerical Recipes
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }
}

impl<T: KeyTransform> ChaoticTransform<T> {
    /// Wrap `inner` with the default seed.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn new(inner: T, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x5EC0_DE5E_C0DE_5EC0)
    }

    /// Wrap `inner` with an explicit seed for reproducible chaos.
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0]
    pub fn with_seed(inner: T, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..=1.0).contains(&failure_rate),
            "failure_rate must be between 0.0 and 1.0, got {failure_rate}"
        );

        Self {
            inner,
            failure_rate,
            rng: Arc::new(Mutex::new(ChaoticRng::new(seed))),
            calls: Arc::new(AtomicUsize::new(0)),
            failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total transform calls attempted, in both directions.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that were failed by injection.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn inject(&self, direction: &str) -> Result<(), TransformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let roll = self.rng.lock().unwrap_or_else(PoisonError::into_inner).next_f64();
        if roll < self.failure_rate {
            self.failures.fetch_add(1, Ordering::SeqCst);
            tracing::trace!(direction, "injecting transform failure");
            return Err(TransformError::Unavailable("chaotic failure injection".to_string()));
        }

        Ok(())
    }
}

impl<T: KeyTransform> KeyTransform for ChaoticTransform<T> {
    fn to_black(&self, clear: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        self.inject("to_black")?;
        self.inner.to_black(clear)
    }

    fn to_clear(&self, black: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        self.inject("to_clear")?;
        self.inner.to_clear(black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_copies() {
        let out = IdentityTransform.to_black(&[1, 2, 3]).unwrap();
        assert_eq!(&out[..], &[1, 2, 3]);
        let back = IdentityTransform.to_clear(&out).unwrap();
        assert_eq!(&back[..], &[1, 2, 3]);
    }

    #[test]
    fn failing_transform_always_fails() {
        let transform = FailingTransform::unavailable();
        assert!(matches!(transform.to_black(&[0; 4]), Err(TransformError::Unavailable(_))));
        assert!(matches!(transform.to_clear(&[0; 4]), Err(TransformError::Unavailable(_))));
    }

    #[test]
    fn chaos_rate_zero_never_fails() {
        let transform = ChaoticTransform::new(IdentityTransform, 0.0);
        for _ in 0..100 {
            assert!(transform.to_black(&[7; 8]).is_ok());
        }
        assert_eq!(transform.call_count(), 100);
        assert_eq!(transform.failure_count(), 0);
    }

    #[test]
    fn chaos_rate_one_always_fails() {
        let transform = ChaoticTransform::new(IdentityTransform, 1.0);
        for _ in 0..50 {
            assert!(transform.to_clear(&[7; 8]).is_err());
        }
        assert_eq!(transform.failure_count(), 50);
    }

    #[test]
    fn chaos_is_reproducible_with_seed() {
        let a = ChaoticTransform::with_seed(IdentityTransform, 0.5, 42);
        let b = ChaoticTransform::with_seed(IdentityTransform, 0.5, 42);

        let outcomes_a: Vec<bool> = (0..64).map(|_| a.to_black(&[0; 4]).is_ok()).collect();
        let outcomes_b: Vec<bool> = (0..64).map(|_| b.to_black(&[0; 4]).is_ok()).collect();

        assert_eq!(outcomes_a, outcomes_b);
        assert!(outcomes_a.iter().any(|&ok| ok));
        assert!(outcomes_a.iter().any(|&ok| !ok));
    }

    #[test]
    fn clones_share_counters() {
        let transform = ChaoticTransform::new(IdentityTransform, 0.0);
        let clone = transform.clone();
        clone.to_black(&[1]).ok();
        assert_eq!(transform.call_count(), 1);
    }
}
