use base64ct::{Base64UrlUnpadded, Encoding};
use getrandom::getrandom;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::error::KeyGenError;

/// Extended Euclidean algorithm.
///
/// Returns `(gcd, x, y)` with `a*x + b*y = gcd`.
pub fn extended_gcd(a: BigInt, b: BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a, BigInt::one(), BigInt::zero());
    }

    let (gcd, x1, y1) = extended_gcd(b.clone(), &a % &b);
    let x = y1.clone();
    let y = x1 - (&a / &b) * y1;

    (gcd, x, y)
}

/// Modular inverse `a^-1 mod m` via the extended Euclidean algorithm.
///
/// Returns `None` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a_bigint = BigInt::from_biguint(Sign::Plus, a.clone());
    let m_bigint = BigInt::from_biguint(Sign::Plus, m.clone());

    let (gcd, x, _) = extended_gcd(a_bigint, m_bigint.clone());
    if gcd != BigInt::one() {
        return None;
    }

    // Ensure a positive result.
    let mut x_mod = x % &m_bigint;
    if x_mod.sign() == Sign::Minus {
        x_mod += &m_bigint;
    }

    Some(x_mod.to_biguint().expect("non-negative"))
}

pub fn gcd_biguint(a: &BigUint, b: &BigUint) -> BigUint {
    let mut x = a.clone();
    let mut y = b.clone();
    while !y.is_zero() {
        let r = &x % &y;
        x = y;
        y = r;
    }
    x
}

/// Encode BigUint as base64url (unpadded).
pub fn encode_biguint_b64u(x: &BigUint) -> String {
    Base64UrlUnpadded::encode_string(&x.to_bytes_be())
}

/// Decode BigUint from base64url (unpadded).
pub fn decode_biguint_b64u(s: &str) -> Result<BigUint, base64ct::Error> {
    let bytes = Base64UrlUnpadded::decode_vec(s)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

pub(crate) fn random_biguint_below(upper: &BigUint) -> Result<BigUint, KeyGenError> {
    if upper.is_zero() {
        return Ok(BigUint::zero());
    }

    // Rejection-sample uniformly in [0, upper).
    //
    // This avoids modulo bias, which matters for Miller–Rabin error bounds when
    // using random bases.
    let bits = upper.bits() as usize;
    let bytes_len = (bits + 7) / 8;
    let top_bits = bits % 8;

    loop {
        let mut buf = vec![0u8; bytes_len];
        getrandom(&mut buf).map_err(|_| KeyGenError::RandomGenerationFailed)?;

        if top_bits != 0 {
            let mask = (1u8 << top_bits) - 1;
            buf[0] &= mask;
        }

        let n = BigUint::from_bytes_be(&buf);
        if &n < upper {
            return Ok(n);
        }
    }
}
