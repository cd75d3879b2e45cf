use num_bigint::BigUint;
use num_traits::One;

use super::{bundled_tester, seeded_source, FakeEntropySource, FailingEntropySource};
use crate::config::REFILL_CHUNKS;
use crate::error::KeyGenError;
use crate::keypair::KeyPairDeriver;
use crate::pool::{PrimeCandidateSource, RandomPool};
use crate::utils::gcd_biguint;

#[test]
fn test_end_to_end_toy_key_pair() {
    // Pool seeded with 61 then 53; the pops come back newest-first.
    let mut deriver = KeyPairDeriver::new(seeded_source(&[61, 53], 5));
    let pair = deriver.generate_keys().expect("key generation failed");

    assert_eq!(pair.p, BigUint::from(53u32));
    assert_eq!(pair.q, BigUint::from(61u32));
    assert_eq!(pair.n, BigUint::from(3233u32));

    // Inverse identity mod the computed reduced totient.
    assert_eq!((&pair.e * &pair.d) % &pair.lambda, BigUint::one());
    assert!(gcd_biguint(&pair.e, &pair.lambda).is_one());

    let public = pair.public();
    let private = pair.private();
    assert_eq!(public.n, pair.n);
    assert_eq!(public.e, pair.e);
    assert_eq!(private.n, pair.n);
    assert_eq!(private.d, pair.d);
}

#[test]
fn test_decrement_search_lands_on_first_prime_below_candidate() {
    // 551 = 19 * 29; the walk passes 550, 549, 548 and stops at 547.
    let mut source = seeded_source(&[551], 5);
    assert_eq!(source.get_random_prime().unwrap(), BigUint::from(547u32));
}

#[test]
fn test_floor_violation_discards_the_candidate() {
    // 65 is composite and sits one step above the 7-bit floor of 64, so the
    // search must abandon it and pop the next candidate instead.
    let mut source = seeded_source(&[127, 65], 7);
    assert_eq!(source.get_random_prime().unwrap(), BigUint::from(127u32));
}

#[test]
fn test_duplicate_primes_still_satisfy_the_inverse_identity() {
    let mut deriver = KeyPairDeriver::new(seeded_source(&[53, 53], 5));
    let pair = deriver.generate_keys().unwrap();

    assert_eq!(pair.p, pair.q);
    assert_eq!(pair.n, BigUint::from(2809u32));
    assert_eq!(pair.lambda, BigUint::from(53u32));
    assert_eq!((&pair.e * &pair.d) % &pair.lambda, BigUint::one());
}

#[test]
fn test_quota_exhaustion_surfaces_through_the_whole_pipeline() {
    let pool = RandomPool::new(FakeEntropySource::new(0, Vec::new()));
    let mut deriver =
        KeyPairDeriver::new(PrimeCandidateSource::with_min_bits(pool, bundled_tester(), 5));

    match deriver.generate_keys() {
        Err(KeyGenError::QuotaExhausted) => {}
        other => panic!("expected QuotaExhausted, got {:?}", other),
    }
}

#[test]
fn test_service_errors_surface_through_the_whole_pipeline() {
    let pool = RandomPool::new(FailingEntropySource { status: 503 });
    let mut deriver =
        KeyPairDeriver::new(PrimeCandidateSource::with_min_bits(pool, bundled_tester(), 5));

    match deriver.generate_keys() {
        Err(KeyGenError::ServiceError(503)) => {}
        other => panic!("expected ServiceError(503), got {:?}", other),
    }
}

#[test]
fn test_cancellation_stops_the_search() {
    let mut source = seeded_source(&[61], 5);
    source.cancel_token().cancel();

    match source.get_random_prime() {
        Err(KeyGenError::Cancelled) => {}
        other => panic!("expected Cancelled, got {:?}", other),
    }
    // The seeded candidate is still buffered for a later attempt.
    assert_eq!(source.pool().len(), 1);
}

#[test]
fn test_key_components_survive_b64u_transport() {
    let mut deriver = KeyPairDeriver::new(seeded_source(&[61, 53], 5));
    let pair = deriver.generate_keys().unwrap();

    let (n, e) = pair.public().to_b64u();
    let decoded = crate::keypair::PublicKey::from_b64u(&n, &e).unwrap();
    assert_eq!(decoded, pair.public());

    let (n, d) = pair.private().to_b64u();
    let decoded = crate::keypair::PrivateKey::from_b64u(&n, &d).unwrap();
    assert_eq!(decoded, pair.private());

    assert!(crate::keypair::PublicKey::from_b64u("???", "AQAB").is_err());
}

#[test]
#[ignore] // Only run manually - a full-scale search takes a while in debug builds.
fn test_full_scale_prime_from_fake_entropy() {
    let mut chunk_bytes = vec![0u8; REFILL_CHUNKS * 2 * 4];
    getrandom::getrandom(&mut chunk_bytes).expect("entropy for test chunks");
    let chunks: Vec<u16> = chunk_bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    let pool = RandomPool::new(FakeEntropySource::new(1_000_000, chunks));
    let mut source = PrimeCandidateSource::new(pool, bundled_tester());

    let prime = source.get_random_prime().expect("no prime found");
    assert!(prime.bits() >= 1024);
    assert!(bundled_tester().is_prime(&prime).unwrap());
}
