//! Polynomial secret sharing.
//!
//! Every member samples random polynomials of degree `t` over the scalar field
//! and hands out their evaluations at the other members' indexes as shares.
//! Any `t + 1` evaluations determine the polynomial, while `t` of them reveal
//! nothing about its constant term.

use core::{
    fmt::{self, Debug},
    iter,
};
use std::collections::{BTreeMap, BTreeSet};

use rand_core::{CryptoRng, RngCore};
use zeroize::{DefaultIsZeroes, Zeroize};

use crate::{
    Ciphersuite, DkgConfig, Error, Field, FieldError, Group, MemberIndex, Scalar,
    SerializableScalar,
};

/// A secret polynomial of degree `t`, stored as its coefficients with the
/// constant term first.
///
/// # Security
///
/// The coefficients MUST NOT leave the member that generated them.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPolynomial<C: Ciphersuite> {
    pub(crate) coefficients: Vec<Scalar<C>>,
}

impl<C> SecretPolynomial<C>
where
    C: Ciphersuite,
{
    /// Sample a uniformly random polynomial of degree `t`, the configured
    /// dishonest threshold.
    pub fn random<R: RngCore + CryptoRng>(config: &DkgConfig, rng: &mut R) -> Self {
        let size = config.group().dishonest_threshold() + 1;
        Self {
            coefficients: generate_coefficients::<C, R>(size, rng),
        }
    }

    /// The degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate the polynomial at the given member's index, yielding the
    /// share for that member.
    pub fn evaluate(&self, index: MemberIndex) -> Share<C> {
        Share::new(evaluate_polynomial::<C>(index, &self.coefficients))
    }
}

impl<C> Debug for SecretPolynomial<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPolynomial")
            .field("degree", &self.degree())
            .field("coefficients", &"<redacted>")
            .finish()
    }
}

impl<C> Zeroize for SecretPolynomial<C>
where
    C: Ciphersuite,
{
    fn zeroize(&mut self) {
        for c in self.coefficients.iter_mut() {
            *c = <<C::Group as Group>::Field>::zero();
        }
    }
}

/// A polynomial evaluation handed to one member.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(transparent)]
pub struct Share<C: Ciphersuite>(pub(crate) SerializableScalar<C>);

impl<C> Share<C>
where
    C: Ciphersuite,
{
    /// Create a new [`Share`] from a scalar.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    #[cfg_attr(docsrs, doc(cfg(feature = "internals")))]
    pub(crate) fn new(scalar: Scalar<C>) -> Self {
        Self(SerializableScalar(scalar))
    }

    /// Get the inner scalar.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    #[cfg_attr(docsrs, doc(cfg(feature = "internals")))]
    pub(crate) fn to_scalar(&self) -> Scalar<C> {
        self.0 .0
    }

    /// Deserialize from bytes
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(SerializableScalar::deserialize(bytes)?))
    }

    /// Serialize to bytes
    pub fn serialize(&self) -> Vec<u8> {
        self.0.serialize()
    }
}

impl<C> Debug for Share<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Share").field(&"<redacted>").finish()
    }
}

impl<C> Default for Share<C>
where
    C: Ciphersuite,
{
    fn default() -> Self {
        Self::new(<<C::Group as Group>::Field>::zero())
    }
}

// Implements [`Zeroize`] by overwriting a value with the [`Default::default()`] value
impl<C> DefaultIsZeroes for Share<C> where C: Ciphersuite {}

/// Return a vector of randomly generated polynomial coefficients ([`Scalar`]s).
pub(crate) fn generate_coefficients<C: Ciphersuite, R: RngCore + CryptoRng>(
    size: usize,
    rng: &mut R,
) -> Vec<Scalar<C>> {
    iter::repeat_with(|| <<C::Group as Group>::Field>::random(rng))
        .take(size)
        .collect()
}

/// Evaluate the polynomial with the given coefficients (constant term first)
/// at the point x=index using Horner's method.
pub(crate) fn evaluate_polynomial<C: Ciphersuite>(
    index: MemberIndex,
    coefficients: &[Scalar<C>],
) -> Scalar<C> {
    let x = index.to_scalar::<C>();
    coefficients
        .iter()
        .rev()
        .fold(<<C::Group as Group>::Field>::zero(), |value, coeff| {
            value * x + *coeff
        })
}

/// Generates the lagrange coefficient for the i'th member, evaluated at
/// x = 0, over the given set of indexes.
///
/// Returns an error if `index` is not in `indexes`.
#[cfg_attr(feature = "internals", visibility::make(pub))]
#[cfg_attr(docsrs, doc(cfg(feature = "internals")))]
pub(crate) fn compute_lagrange_coefficient<C: Ciphersuite>(
    indexes: &BTreeSet<MemberIndex>,
    index: MemberIndex,
) -> Result<Scalar<C>, Error> {
    if !indexes.contains(&index) {
        return Err(Error::UnknownMember { index });
    }

    let x_i = index.to_scalar::<C>();
    let mut num = <<C::Group as Group>::Field>::one();
    let mut den = <<C::Group as Group>::Field>::one();

    for x_j in indexes.iter().filter(|j| **j != index) {
        let x_j = x_j.to_scalar::<C>();
        num = num * x_j;
        den = den * (x_j - x_i);
    }

    if den == <<C::Group as Group>::Field>::zero() {
        return Err(FieldError::InvalidZeroScalar.into());
    }

    Ok(num * <<C::Group as Group>::Field>::invert(&den)?)
}

/// Interpolate the constant term of the polynomial going through the given
/// points.
pub(crate) fn interpolate_secret<C: Ciphersuite>(
    points: &BTreeMap<MemberIndex, Scalar<C>>,
) -> Result<Scalar<C>, Error> {
    let indexes: BTreeSet<_> = points.keys().copied().collect();
    let mut secret = <<C::Group as Group>::Field>::zero();
    for (index, y) in points {
        secret = secret + compute_lagrange_coefficient::<C>(&indexes, *index)? * *y;
    }
    Ok(secret)
}
