//! Polynomial sharing functions

use std::collections::{BTreeMap, BTreeSet};

use rand_core::{CryptoRng, RngCore};

use crate::{
    pedersen,
    polynomial::{compute_lagrange_coefficient, interpolate_secret, SecretPolynomial},
    tests::helpers::{indexes, member},
    Ciphersuite, DkgConfig, Error, Field, Group,
};

/// Test that random polynomials have degree `t`.
pub fn check_random_polynomial_degree<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    for (n, t) in [(1, 0), (3, 1), (5, 2), (10, 9)] {
        let config = DkgConfig::new(n, t).unwrap();
        let polynomial = SecretPolynomial::<C>::random(&config, &mut rng);
        assert_eq!(polynomial.degree(), t);
        assert_eq!(polynomial.coefficients.len(), t + 1);
    }
}

/// Test that dealing with the same randomness yields the same shares and
/// commitments.
pub fn check_deterministic_dealing<C: Ciphersuite, R: RngCore + CryptoRng + Clone>(rng: R) {
    let config = DkgConfig::new(5, 2).unwrap();
    let deal = |mut rng: R| {
        let secret = SecretPolynomial::<C>::random(&config, &mut rng);
        let blinding = SecretPolynomial::<C>::random(&config, &mut rng);
        let commitments = pedersen::commit(&secret, &blinding).unwrap();
        let shares: Vec<_> = config
            .group()
            .member_indexes()
            .map(|index| (secret.evaluate(index), blinding.evaluate(index)))
            .collect();
        (commitments, shares)
    };

    assert_eq!(deal(rng.clone()), deal(rng));
}

/// Test that any `t + 1` shares interpolate to the constant term, while `t`
/// shares do not.
pub fn check_interpolate_secret<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let config = DkgConfig::new(7, 3).unwrap();
    let polynomial = SecretPolynomial::<C>::random(&config, &mut rng);
    let secret = polynomial.coefficients[0];

    for subset in [[1, 2, 3, 4], [4, 5, 6, 7], [1, 3, 5, 7], [7, 2, 6, 1]] {
        let points: BTreeMap<_, _> = indexes(subset)
            .into_iter()
            .map(|index| (index, polynomial.evaluate(index).to_scalar()))
            .collect();
        assert!(interpolate_secret::<C>(&points).unwrap() == secret);
    }

    // More points than needed still lie on the polynomial.
    let points: BTreeMap<_, _> = config
        .group()
        .member_indexes()
        .map(|index| (index, polynomial.evaluate(index).to_scalar()))
        .collect();
    assert!(interpolate_secret::<C>(&points).unwrap() == secret);

    let points: BTreeMap<_, _> = indexes([2, 4, 6])
        .into_iter()
        .map(|index| (index, polynomial.evaluate(index).to_scalar()))
        .collect();
    assert!(interpolate_secret::<C>(&points).unwrap() != secret);
}

/// Test the Lagrange coefficients of a small set against hand-computed
/// values.
pub fn check_lagrange_coefficients<C: Ciphersuite>() {
    let indexes: BTreeSet<_> = indexes([1, 2, 3]).into_iter().collect();
    let one = <<C::Group as Group>::Field>::one();
    let two = one + one;
    let three = two + one;

    // λ_1 = 2·3 / ((2-1)(3-1)) = 3
    assert!(compute_lagrange_coefficient::<C>(&indexes, member(1)).unwrap() == three);
    // λ_1 + λ_2 + λ_3 = 1 for any set
    let sum = indexes.iter().fold(<<C::Group as Group>::Field>::zero(), |sum, index| {
        sum + compute_lagrange_coefficient::<C>(&indexes, *index).unwrap()
    });
    assert!(sum == one);

    assert_eq!(
        compute_lagrange_coefficient::<C>(&indexes, member(4)).err(),
        Some(Error::UnknownMember { index: member(4) })
    );
}
