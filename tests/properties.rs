//! Statistical and behavioral property tests.
//!
//! Randomized cases use a fixed seed so failures are reproducible.

use bloomscale::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_keys(rng: &mut StdRng, count: usize) -> Vec<[u8; 16]> {
    (0..count).map(|_| rng.gen()).collect()
}

#[test]
fn test_inserted_keys_are_always_found() {
    let mut rng = StdRng::seed_from_u64(0x1001);
    let mut filter = PartitionedCountingFilter::new(5000, 0.01).unwrap();

    let keys = random_keys(&mut rng, 5000);
    for key in &keys {
        filter.add(key);
    }
    for key in &keys {
        assert!(filter.query(key), "false negative at capacity");
    }
}

#[test]
fn test_false_positive_rate_near_target_at_capacity() {
    let mut rng = StdRng::seed_from_u64(0x1002);
    let target = 0.01;
    let mut filter = PartitionedCountingFilter::new(10_000, target).unwrap();

    for key in random_keys(&mut rng, 10_000) {
        filter.add(&key);
    }

    // 16-byte random keys collide with the inserted set with negligible
    // probability, so every hit is a false positive.
    let trials = 10_000;
    let false_positives = random_keys(&mut rng, trials)
        .iter()
        .filter(|key| filter.query(*key))
        .count();
    let observed = false_positives as f64 / trials as f64;

    assert!(
        observed <= target * 3.0,
        "observed fp rate {} exceeds 3x target {}",
        observed,
        target
    );
}

#[test]
fn test_deleted_keys_stop_matching() {
    let mut rng = StdRng::seed_from_u64(0x1003);
    // Very low target rate, so residual matches after delete would be
    // genuine bugs rather than chance false positives.
    let mut filter = PartitionedCountingFilter::new(1000, 0.0001).unwrap();

    let keys = random_keys(&mut rng, 500);
    for key in &keys {
        filter.add(key);
    }
    for key in &keys {
        filter.delete(key).unwrap();
    }
    let residual = keys.iter().filter(|key| filter.query(*key)).count();
    assert_eq!(residual, 0, "{} keys survived deletion", residual);
    assert!(filter.is_empty());
}

#[test]
fn test_failed_delete_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(0x1004);
    let mut filter = PartitionedCountingFilter::new(1000, 0.0001).unwrap();

    let keys = random_keys(&mut rng, 500);
    for key in &keys {
        filter.add(key);
    }

    // Keys drawn from the same space but disjoint from the inserted set.
    for key in random_keys(&mut rng, 100) {
        if !filter.query(&key) {
            assert!(filter.delete(&key).is_err());
        }
    }

    assert_eq!(filter.len(), 500);
    for key in &keys {
        assert!(filter.query(key), "failed deletes damaged live keys");
    }
}

#[test]
fn test_saturated_counters_never_produce_false_negatives() {
    let mut filter = PartitionedCountingFilter::new(100, 0.01).unwrap();

    // Push one key's counters well past the 4-bit maximum.
    for _ in 0..100 {
        filter.add(b"hotspot");
    }
    assert!(filter.has_saturated());
    assert!(filter.query(b"hotspot"));

    // Matching deletes cannot drain a pinned counter.
    for _ in 0..100 {
        let _ = filter.delete(b"hotspot");
    }
    assert!(filter.query(b"hotspot"));
}

#[test]
fn test_chain_growth_preserves_membership() {
    let mut chain = ScalableFilterChain::new(10, 0.001).unwrap();

    for i in 0..10u32 {
        chain.add(&i.to_le_bytes());
    }
    assert_eq!(chain.filter_count(), 1);

    chain.add(&10u32.to_le_bytes());
    assert_eq!(chain.filter_count(), 2);
    // 10 original plus a 4x growth filter.
    assert_eq!(chain.capacity(), 50);

    for i in 0..=10u32 {
        assert!(chain.contains(&i.to_le_bytes()));
    }
}

#[test]
fn test_chain_compound_rate_holds_across_many_growths() {
    let mut rng = StdRng::seed_from_u64(0x1005);
    let budget = 0.01;
    let mut chain = ScalableFilterChain::new(100, budget).unwrap();

    let keys = random_keys(&mut rng, 20_000);
    for key in &keys {
        chain.add(key);
    }
    assert!(chain.filter_count() >= 3);

    let trials = 10_000;
    let false_positives = random_keys(&mut rng, trials)
        .iter()
        .filter(|key| chain.contains(*key))
        .count();
    let observed = false_positives as f64 / trials as f64;

    assert!(chain.max_fpr() < budget);
    assert!(
        observed <= budget * 3.0,
        "observed chain fp rate {} exceeds 3x budget {}",
        observed,
        budget
    );
}

#[test]
fn test_sizing_formulas_are_deterministic() {
    let filter = PartitionedCountingFilter::new(20, 0.08).unwrap();
    // m = ceil(-20 * ln(0.08) / ln(2)^2) = 106
    // k = clamp(round((106 / 20) * ln 2), 1, 32) = 4
    // partition size = floor(106 / 4) = 26
    assert_eq!(filter.hash_count(), 4);
    assert_eq!(filter.partition_size(), 26);
    assert_eq!(filter.bit_count(), 104);

    let again = PartitionedCountingFilter::new(20, 0.08).unwrap();
    assert_eq!(again.hash_count(), filter.hash_count());
    assert_eq!(again.partition_size(), filter.partition_size());
}
