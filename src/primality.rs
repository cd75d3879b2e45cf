//! Probabilistic primality testing.
//!
//! Two stages: trial division against the small-prime table, which rejects
//! most composites cheaply and accepts the table primes verbatim, then a
//! Miller-Rabin test with independently chosen random bases. A "prime"
//! verdict is probabilistic with error bound 4^-rounds per call; the default
//! round count is sized for key generation, not for verifying adversarial
//! inputs.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::config::MILLER_RABIN_ROUNDS;
use crate::error::KeyGenError;
use crate::table::SmallPrimeTable;
use crate::utils::random_biguint_below;

pub struct PrimalityTester {
    table: SmallPrimeTable,
    rounds: usize,
}

impl PrimalityTester {
    pub fn new(table: SmallPrimeTable) -> Self {
        Self::with_rounds(table, MILLER_RABIN_ROUNDS)
    }

    /// Tester with a custom witness-round count. More rounds tighten the
    /// error bound at linear cost.
    pub fn with_rounds(table: SmallPrimeTable, rounds: usize) -> Self {
        Self { table, rounds }
    }

    /// Whether `n` is (probably) prime.
    ///
    /// Fallible because witness bases are drawn from OS randomness.
    pub fn is_prime(&self, n: &BigUint) -> Result<bool, KeyGenError> {
        for small_prime in self.table.iter() {
            let small_prime = BigUint::from(small_prime);
            if *n == small_prime {
                return Ok(true);
            }
            if (n % &small_prime).is_zero() {
                return Ok(false);
            }
        }

        self.miller_rabin(n)
    }

    fn miller_rabin(&self, n: &BigUint) -> Result<bool, KeyGenError> {
        let one = BigUint::one();
        let two = &one + &one;
        let three = &two + &one;

        if *n < two {
            return Ok(false);
        }
        if *n == two {
            return Ok(true);
        }
        if (n % &two).is_zero() {
            return Ok(false);
        }

        // Write n-1 as d * 2^s with d odd.
        let n_minus_1 = n - &one;
        let mut d = n_minus_1.clone();
        let mut s: u32 = 0;
        while (&d % &two).is_zero() {
            d >>= 1;
            s += 1;
        }

        // Independent witness rounds with random bases a in [2, n-2].
        for _ in 0..self.rounds {
            let a = random_biguint_below(&(n - &three))? + &two;
            let mut x = a.modpow(&d, n);
            if x == one || x == n_minus_1 {
                continue;
            }

            let mut passed = false;
            for _ in 1..s {
                x = (&x * &x) % n;
                if x == n_minus_1 {
                    passed = true;
                    break;
                }
                if x == one {
                    return Ok(false);
                }
            }

            if !passed {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
