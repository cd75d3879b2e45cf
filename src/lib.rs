//! RSA key-pair generation from an external entropy service.
//!
//! This crate turns raw random chunks served by a true-randomness API into
//! prime candidates, filters them through trial division and a Miller-Rabin
//! test, and combines two surviving primes into an RSA key pair.
//!
//! # Pipeline
//!
//! 1. [`RandomPool`] buffers candidates assembled from 16-bit entropy
//!    chunks, refilling in batches behind a quota check
//! 2. [`PrimeCandidateSource`] pops candidates and walks each one downward
//!    until one passes [`PrimalityTester`]
//! 3. [`KeyPairDeriver`] combines two primes into `(n, e)` / `(n, d)`
//!
//! The entropy provider sits behind the [`EntropySource`] trait; tests run
//! the identical pipeline against deterministic in-memory sources.

pub mod config;
pub mod entropy;
pub mod error;
pub mod keypair;
pub mod pool;
pub mod primality;
pub mod table;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::entropy::{EntropySource, RandomOrgClient};
pub use crate::error::KeyGenError;
pub use crate::keypair::{KeyPair, KeyPairDeriver, PrivateKey, PublicKey};
pub use crate::pool::{CancelToken, PrimeCandidateSource, RandomPool};
pub use crate::primality::PrimalityTester;
pub use crate::table::SmallPrimeTable;
pub use crate::utils::{decode_biguint_b64u, encode_biguint_b64u, extended_gcd, mod_inverse};
