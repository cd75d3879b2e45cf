//! Candidate pool and prime search.
//!
//! [`RandomPool`] buffers unchecked candidates assembled from entropy-service
//! chunks; [`PrimeCandidateSource`] drains it, walking each candidate
//! downward until one tests prime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::config::{
    CANDIDATE_BITS, CHUNKS_PER_CANDIDATE, CHUNK_BITS, MAX_DECREMENT_STEPS, REFILL_CHUNKS,
};
use crate::entropy::EntropySource;
use crate::error::KeyGenError;
use crate::primality::PrimalityTester;

/// Cooperative cancellation handle for long-running searches.
///
/// Cloning yields another handle to the same flag; a cancelled search
/// returns [`KeyGenError::Cancelled`] and leaves the pool intact.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Buffer of unchecked prime candidates, consumed most-recent-first.
///
/// An empty pool triggers a batched refill from the entropy source, gated by
/// a quota probe.
pub struct RandomPool<S: EntropySource> {
    source: S,
    unchecked: Vec<BigUint>,
}

impl<S: EntropySource> RandomPool<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            unchecked: Vec::new(),
        }
    }

    /// Pop the most recently buffered candidate, refilling when empty.
    pub fn request_prime_candidate(&mut self) -> Result<BigUint, KeyGenError> {
        if self.unchecked.is_empty() {
            self.refill()?;
        }

        match self.unchecked.pop() {
            Some(candidate) => Ok(candidate),
            None => Err(KeyGenError::MalformedResponse(
                "refill yielded no candidates".to_string(),
            )),
        }
    }

    /// Refill the pool from the entropy source.
    ///
    /// The remaining quota is probed first: a non-positive quota fails with
    /// [`KeyGenError::QuotaExhausted`] before any chunk fetch. The fetched
    /// batch is cut into groups of [`CHUNKS_PER_CANDIDATE`] chunks, each
    /// assembled into one candidate.
    pub fn refill(&mut self) -> Result<(), KeyGenError> {
        let quota = self.source.remaining_quota()?;
        if quota <= 0 {
            return Err(KeyGenError::QuotaExhausted);
        }

        let chunks = self.source.fetch_chunks(REFILL_CHUNKS)?;
        if chunks.len() < CHUNKS_PER_CANDIDATE {
            return Err(KeyGenError::MalformedResponse(format!(
                "expected at least {} chunks, got {}",
                CHUNKS_PER_CANDIDATE,
                chunks.len()
            )));
        }

        for group in chunks.chunks_exact(CHUNKS_PER_CANDIDATE) {
            self.unchecked.push(assemble_candidate(group));
        }
        debug!("pool refilled, {} candidates buffered", self.unchecked.len());

        Ok(())
    }

    /// Buffer a pre-assembled candidate directly, bypassing the entropy
    /// source. Buffered candidates are popped before older ones.
    pub fn push_candidate(&mut self, candidate: BigUint) {
        self.unchecked.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.unchecked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unchecked.is_empty()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Join fixed-width chunks into one candidate, most-significant chunk first.
///
/// The top bit is forced to 1 so every assembled candidate reaches the
/// nominal [`CANDIDATE_BITS`] length.
fn assemble_candidate(chunks: &[u16]) -> BigUint {
    let mut candidate = BigUint::zero();
    for &chunk in chunks {
        candidate = (candidate << CHUNK_BITS) | BigUint::from(chunk);
    }
    candidate.set_bit(CANDIDATE_BITS - 1, true);
    candidate
}

/// Draws candidates from the pool and searches each one downward for a prime.
pub struct PrimeCandidateSource<S: EntropySource> {
    pool: RandomPool<S>,
    tester: PrimalityTester,
    min_bits: u64,
    cancel: CancelToken,
}

impl<S: EntropySource> PrimeCandidateSource<S> {
    pub fn new(pool: RandomPool<S>, tester: PrimalityTester) -> Self {
        Self::with_min_bits(pool, tester, CANDIDATE_BITS)
    }

    /// Source with a custom bit-length floor, so the search runs unchanged
    /// at toy scales.
    pub fn with_min_bits(pool: RandomPool<S>, tester: PrimalityTester, min_bits: u64) -> Self {
        assert!(min_bits >= 2, "bit-length floor must be at least 2");
        Self {
            pool,
            tester,
            min_bits,
            cancel: CancelToken::new(),
        }
    }

    /// A handle that cancels searches in progress on this source.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn pool(&self) -> &RandomPool<S> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut RandomPool<S> {
        &mut self.pool
    }

    /// Find the next probable prime.
    ///
    /// Each candidate is retested after decrementing by one, at most
    /// [`MAX_DECREMENT_STEPS`] times. The bit-length floor is checked before
    /// every decrement, so the search can never walk below it; a candidate
    /// sitting on the floor (or out of steps) is discarded for a fresh draw.
    pub fn get_random_prime(&mut self) -> Result<BigUint, KeyGenError> {
        // Smallest value with `min_bits` bits; decrementing past it would
        // shorten the candidate.
        let floor = BigUint::one() << (self.min_bits - 1);

        loop {
            if self.cancel.is_cancelled() {
                return Err(KeyGenError::Cancelled);
            }

            let mut candidate = self.pool.request_prime_candidate()?;
            for _ in 0..MAX_DECREMENT_STEPS {
                if self.cancel.is_cancelled() {
                    return Err(KeyGenError::Cancelled);
                }
                if self.tester.is_prime(&candidate)? {
                    return Ok(candidate);
                }
                if candidate <= floor {
                    break;
                }
                candidate -= 1u32;
            }
            debug!("candidate exhausted, drawing a fresh one");
        }
    }
}
