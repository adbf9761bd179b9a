//! Folding the same samples in different orders must give the same aggregate.

use assert_approx_eq::assert_approx_eq;
use assert2::check;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rstest::rstest;
use tally_aggregation::{Aggregator, WindowMode};
use tally_core::{BucketCounts, MergeKind, Sample};

fn random_sample(kind: MergeKind, rng: &mut impl Rng) -> Sample {
    let start = rng.random_range(0..1_000_000);
    let sample = match kind {
        MergeKind::HitCount => Sample::hit_count(rng.random_range(0..10_000)),
        MergeKind::Histogram => {
            let buckets = (0..rng.random_range(0..8))
                .map(|_| (rng.random_range(-20i64..20), rng.random_range(0u64..100)))
                .collect::<BucketCounts>();
            Sample::histogram(buckets)
        }
        MergeKind::Minimum => Sample::minimum(
            rng.random_range(-1e6..1e6),
            rng.random_range(0..1_000),
        ),
        MergeKind::Maximum => Sample::maximum(
            rng.random_range(-1e6..1e6),
            rng.random_range(0..1_000),
        ),
        MergeKind::Average => Sample::average(
            rng.random_range(-1e6..1e6),
            rng.random_range(0..1_000),
        ),
    };
    sample.with_window(start, start + rng.random_range(0..60_000))
}

fn assert_same_aggregate(a: &Sample, b: &Sample) {
    check!(a.kind == b.kind);
    check!(a.window() == b.window());
    check!(a.hit_count == b.hit_count);
    check!(a.histogram == b.histogram);
    check!(a.min_value == b.min_value);
    check!(a.max_value == b.max_value);
    check!(a.sample_count == b.sample_count);
    assert_approx_eq!(a.average, b.average, 1e-3);
}

#[rstest]
#[case::hit_count(MergeKind::HitCount)]
#[case::histogram(MergeKind::Histogram)]
#[case::minimum(MergeKind::Minimum)]
#[case::maximum(MergeKind::Maximum)]
#[case::average(MergeKind::Average)]
fn shuffled_folds_agree(#[case] kind: MergeKind) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut samples: Vec<_> = (0..200).map(|_| random_sample(kind, &mut rng)).collect();

    let expected = Aggregator::fold(&samples, WindowMode::Union)
        .unwrap()
        .into_sample();
    for _ in 0..10 {
        samples.shuffle(&mut rng);
        let actual = Aggregator::fold(&samples, WindowMode::Union)
            .unwrap()
            .into_sample();
        assert_same_aggregate(&actual, &expected);
    }
}

#[rstest]
#[case::hit_count(MergeKind::HitCount)]
#[case::histogram(MergeKind::Histogram)]
#[case::minimum(MergeKind::Minimum)]
#[case::maximum(MergeKind::Maximum)]
#[case::average(MergeKind::Average)]
fn tree_reduction_matches_sequential_fold(#[case] kind: MergeKind) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let samples: Vec<_> = (0..64).map(|_| random_sample(kind, &mut rng)).collect();

    let sequential = Aggregator::fold(&samples, WindowMode::Union)
        .unwrap()
        .into_sample();

    // merge pairs of partial aggregates until one remains
    let mut level: Vec<Sample> = samples;
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                Aggregator::fold(pair, WindowMode::Union)
                    .unwrap()
                    .into_sample()
            })
            .collect();
    }
    assert_same_aggregate(&level[0], &sequential);
}
