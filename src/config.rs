//! Library configuration and generation parameters.

/// Nominal bit length of a prime candidate assembled from the entropy stream.
pub const CANDIDATE_BITS: u64 = 1024;

/// Bit width of a single random chunk served by the entropy service.
pub const CHUNK_BITS: usize = 16;

/// Chunks concatenated into one candidate (`CANDIDATE_BITS / CHUNK_BITS`).
pub const CHUNKS_PER_CANDIDATE: usize = 64;

/// Chunks requested per pool refill; yields 15 candidates per batch.
pub const REFILL_CHUNKS: usize = 960;

/// Independent witness rounds for the Miller-Rabin test. The per-candidate
/// error bound is 4^-rounds.
pub const MILLER_RABIN_ROUNDS: usize = 10;

/// Downward steps allowed on one candidate before it is discarded for a
/// fresh draw from the pool.
pub const MAX_DECREMENT_STEPS: usize = 10_000;

/// Timeout for one entropy-service round-trip.
pub const ENTROPY_TIMEOUT_SECS: u64 = 10;

/// Attempts per entropy request before a transient failure becomes terminal.
pub const ENTROPY_RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff between retries, doubled after each attempt.
pub const ENTROPY_RETRY_BACKOFF_MS: u64 = 250;

/// First candidate tried when searching for the public exponent.
pub const EXPONENT_SEARCH_START: u32 = 3;
