//! Pedersen and Feldman commitments to polynomial coefficients.
//!
//! A Pedersen commitment `C_k = g·a_k + h·b_k` to the coefficients of the
//! secret polynomial `a`, blinded by the polynomial `b`, is perfectly hiding:
//! it reveals nothing about the secret, which is what keeps a member from
//! biasing the group key after seeing the other members' commitments. Once
//! the qualified set is fixed the members reveal the Feldman commitments
//! `A_k = g·a_k` ("public key share points"), from which the group public key
//! is derived.

use core::fmt::{self, Debug};

use crate::{
    polynomial::{SecretPolynomial, Share},
    Ciphersuite, Element, Error, Field, Group, MemberIndex, SerializableElement,
};

/// A [`Group::Element`] newtype that is a commitment to one coefficient of a
/// secret polynomial.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(transparent)]
pub struct CoefficientCommitment<C: Ciphersuite>(pub(crate) SerializableElement<C>);

impl<C> CoefficientCommitment<C>
where
    C: Ciphersuite,
{
    /// Create a new CoefficientCommitment.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    pub(crate) fn new(value: Element<C>) -> Self {
        Self(SerializableElement(value))
    }

    /// Deserialize from bytes
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(SerializableElement::deserialize(bytes)?))
    }

    /// Serialize to bytes
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.0.serialize()
    }

    /// Returns inner element value
    pub fn value(&self) -> Element<C> {
        self.0 .0
    }
}

impl<C> Debug for CoefficientCommitment<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CoefficientCommitment")
            .field(
                &self
                    .serialize()
                    .map(hex::encode)
                    .unwrap_or("<invalid>".to_string()),
            )
            .finish()
    }
}

/// The Pedersen commitments `C_k = g·a_k + h·b_k` to the coefficients of a
/// member's secret polynomial `a`, blinded by the polynomial `b`.
///
/// Members MUST be assured that they all hold the *same* commitment of a
/// given dealer, which is why it is sent over the broadcast channel.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
pub struct PedersenCommitment<C: Ciphersuite>(pub(crate) Vec<CoefficientCommitment<C>>);

impl<C> PedersenCommitment<C>
where
    C: Ciphersuite,
{
    /// Returns serialized coefficient commitments
    pub fn serialize(&self) -> Result<Vec<Vec<u8>>, Error> {
        self.0
            .iter()
            .map(|cc| cc.serialize())
            .collect::<Result<_, Error>>()
    }

    /// Returns a PedersenCommitment from an iterator of serialized
    /// CoefficientCommitments (e.g. a [`Vec<Vec<u8>>`]).
    pub fn deserialize<I, V>(serialized_coefficient_commitments: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        serialized_coefficient_commitments
            .into_iter()
            .map(|cc| CoefficientCommitment::<C>::deserialize(cc.as_ref()))
            .collect::<Result<_, Error>>()
            .map(Self)
    }

    /// Returns the coefficient commitments.
    pub fn coefficients(&self) -> &[CoefficientCommitment<C>] {
        &self.0
    }

    /// Checks that the share pair `(share_s, share_t)` dealt to `index` is
    /// consistent with the commitments, i.e. that
    /// `g·s + h·t == Σ_k C_k·index^k`.
    ///
    /// This never learns the committed coefficients.
    pub fn verify(&self, index: MemberIndex, share_s: &Share<C>, share_t: &Share<C>) -> bool {
        let expected = <C::Group>::generator() * share_s.to_scalar()
            + C::blinding_generator() * share_t.to_scalar();
        !self.0.is_empty() && expected == evaluate_commitment(index, &self.0)
    }
}

/// Commit to the coefficients of the secret polynomial `secret`, blinded by
/// the coefficients of `blinding`.
///
/// Both polynomials must have the same degree.
pub fn commit<C: Ciphersuite>(
    secret: &SecretPolynomial<C>,
    blinding: &SecretPolynomial<C>,
) -> Result<PedersenCommitment<C>, Error> {
    if secret.coefficients.len() != blinding.coefficients.len() {
        return Err(Error::IncorrectNumberOfCommitments);
    }
    let g = <C::Group>::generator();
    let h = C::blinding_generator();
    Ok(PedersenCommitment(
        secret
            .coefficients
            .iter()
            .zip(blinding.coefficients.iter())
            .map(|(a, b)| CoefficientCommitment::new(g * *a + h * *b))
            .collect(),
    ))
}

/// The Feldman commitments `A_k = g·a_k` to the coefficients of a member's
/// secret polynomial, revealed once the qualified set is known.
///
/// The first element is the member's contribution to the group public key.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
pub struct PublicCoefficients<C: Ciphersuite>(pub(crate) Vec<CoefficientCommitment<C>>);

impl<C> PublicCoefficients<C>
where
    C: Ciphersuite,
{
    /// Compute the public coefficients of a secret polynomial.
    pub fn from_polynomial(polynomial: &SecretPolynomial<C>) -> Self {
        Self(
            polynomial
                .coefficients
                .iter()
                .map(|a| CoefficientCommitment::new(<C::Group>::generator() * *a))
                .collect(),
        )
    }

    /// Returns the coefficient commitments.
    pub fn coefficients(&self) -> &[CoefficientCommitment<C>] {
        &self.0
    }

    /// The commitment to the constant term, `A_0 = g·a_0`.
    pub fn constant_term(&self) -> Result<Element<C>, Error> {
        self.0
            .first()
            .map(|c| c.value())
            .ok_or(Error::IncorrectNumberOfCommitments)
    }

    /// Checks that `share_s` dealt to `index` is consistent with the public
    /// coefficients, i.e. that `g·s == Σ_k A_k·index^k`.
    pub fn verify(&self, index: MemberIndex, share_s: &Share<C>) -> bool {
        let expected = <C::Group>::generator() * share_s.to_scalar();
        !self.0.is_empty() && expected == evaluate_commitment(index, &self.0)
    }
}

/// Evaluates the right-hand side of the verification equations, namely
/// `Σ_k φ_k·index^k` for the commitment vector φ.
fn evaluate_commitment<C: Ciphersuite>(
    index: MemberIndex,
    commitments: &[CoefficientCommitment<C>],
) -> Element<C> {
    let i = index.to_scalar::<C>();

    let (_, result) = commitments.iter().fold(
        (<<C::Group as Group>::Field>::one(), <C::Group>::identity()),
        |(i_to_the_k, sum_so_far), comm_k| {
            (i * i_to_the_k, sum_so_far + comm_k.value() * i_to_the_k)
        },
    );
    result
}
