use std::sync::OnceLock;

use num_bigint::BigUint;

use crate::entropy::EntropySource;
use crate::error::KeyGenError;
use crate::pool::{PrimeCandidateSource, RandomPool};
use crate::primality::PrimalityTester;
use crate::table::SmallPrimeTable;

fn bundled_table() -> &'static SmallPrimeTable {
    static TABLE: OnceLock<SmallPrimeTable> = OnceLock::new();
    TABLE.get_or_init(SmallPrimeTable::bundled)
}

fn bundled_tester() -> PrimalityTester {
    PrimalityTester::new(bundled_table().clone())
}

/// Scripted entropy source serving a fixed quota and chunk stream.
pub struct FakeEntropySource {
    pub quota: i64,
    pub chunks: Vec<u16>,
    pub quota_calls: usize,
    pub fetch_calls: usize,
}

impl FakeEntropySource {
    pub fn new(quota: i64, chunks: Vec<u16>) -> Self {
        Self {
            quota,
            chunks,
            quota_calls: 0,
            fetch_calls: 0,
        }
    }
}

impl EntropySource for FakeEntropySource {
    fn remaining_quota(&mut self) -> Result<i64, KeyGenError> {
        self.quota_calls += 1;
        Ok(self.quota)
    }

    fn fetch_chunks(&mut self, count: usize) -> Result<Vec<u16>, KeyGenError> {
        self.fetch_calls += 1;
        let take = count.min(self.chunks.len());
        Ok(self.chunks.drain(..take).collect())
    }
}

/// Source that fails both endpoints with a fixed HTTP status.
pub struct FailingEntropySource {
    pub status: u16,
}

impl EntropySource for FailingEntropySource {
    fn remaining_quota(&mut self) -> Result<i64, KeyGenError> {
        Err(KeyGenError::ServiceError(self.status))
    }

    fn fetch_chunks(&mut self, _count: usize) -> Result<Vec<u16>, KeyGenError> {
        Err(KeyGenError::ServiceError(self.status))
    }
}

/// Candidate source pre-seeded with `candidates` (popped newest-first) and a
/// toy bit-length floor, over a fake with ample quota and no chunk stream.
fn seeded_source(candidates: &[u64], min_bits: u64) -> PrimeCandidateSource<FakeEntropySource> {
    let mut pool = RandomPool::new(FakeEntropySource::new(1_000_000, Vec::new()));
    for &candidate in candidates {
        pool.push_candidate(BigUint::from(candidate));
    }
    PrimeCandidateSource::with_min_bits(pool, bundled_tester(), min_bits)
}

pub mod integration;
