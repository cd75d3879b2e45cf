//! Small-prime table for fast composite rejection.

use crate::error::KeyGenError;

/// First 10,000 primes, rows of space-separated decimal values.
const BUNDLED_TABLE: &str = include_str!("../data/primes.txt");

/// Immutable, ordered list of small primes, loaded once and shared for the
/// life of the process.
#[derive(Clone, Debug)]
pub struct SmallPrimeTable {
    primes: Vec<u32>,
}

impl SmallPrimeTable {
    /// Parse a whitespace-delimited text resource of known primes.
    ///
    /// The table must be non-empty and strictly ascending.
    pub fn parse(text: &str) -> Result<Self, KeyGenError> {
        let mut primes = Vec::new();
        for token in text.split_whitespace() {
            let value: u32 = token.parse().map_err(|_| {
                KeyGenError::PrimeTable(format!("non-numeric entry {:?}", token))
            })?;
            primes.push(value);
        }

        if primes.is_empty() {
            return Err(KeyGenError::PrimeTable("table is empty".to_string()));
        }
        if primes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(KeyGenError::PrimeTable(
                "table is not strictly ascending".to_string(),
            ));
        }

        Ok(Self { primes })
    }

    /// The table bundled with the crate: the first 10,000 primes.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_TABLE).expect("bundled prime table is well-formed")
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.primes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Largest prime covered by the table.
    pub fn ceiling(&self) -> u32 {
        *self.primes.last().expect("table is non-empty")
    }
}
