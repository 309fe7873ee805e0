//! Ciphersuite-generic benchmark functions.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput};
use rand_core::{CryptoRng, RngCore};

use crate::{
    gjkr::LocalMember, tests::helpers::run_protocol, Ciphersuite, DkgConfig, MemberIndex,
};

/// Group sizes benchmarked, each with the largest tolerated dishonest
/// threshold `t < n / 2`.
const GROUP_SIZES: [usize; 4] = [3, 10, 32, 64];

fn config(n: usize) -> DkgConfig {
    DkgConfig::new(n, (n - 1) / 2).unwrap()
}

/// Benchmark dealing shares and commitments with the specified ciphersuite.
pub fn bench_dealing<C: Ciphersuite, R: RngCore + CryptoRng + Clone>(
    c: &mut Criterion,
    name: &str,
    rng: &mut R,
) {
    let mut group = c.benchmark_group(format!("GJKR {name}"));
    for n in GROUP_SIZES {
        let config = Arc::new(config(n));
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("Dealing", n), &config, |b, config| {
            let mut rng = rng.clone();
            b.iter(|| {
                LocalMember::new(MemberIndex::new(1).unwrap(), config.clone())
                    .unwrap()
                    .calculate_shares_and_commitments::<C, R>(&mut rng)
                    .unwrap()
            })
        });
    }
    group.finish();
}

/// Benchmark a whole round, run in memory, with the specified ciphersuite.
pub fn bench_protocol<C: Ciphersuite, R: RngCore + CryptoRng + Clone>(
    c: &mut Criterion,
    name: &str,
    rng: &mut R,
) {
    let mut group = c.benchmark_group(format!("GJKR {name}"));
    group.sample_size(10);
    for n in GROUP_SIZES {
        let config = config(n);
        let members: Vec<_> = config.group().member_indexes().collect();
        group.bench_with_input(BenchmarkId::new("Round", n), &config, |b, config| {
            let mut rng = rng.clone();
            b.iter(|| run_protocol::<C, R>(config.clone(), &members, &mut rng))
        });
    }
    group.finish();
}
