#![allow(non_snake_case)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! GJKR distributed key generation over the [ristretto255] group.
//!
//! Pedersen commitments use the ristretto255 basepoint as `g` and, as the
//! blinding generator `h`, the point obtained by hashing the ciphersuite
//! context string to the group with SHA-512, so that nobody knows `log_g(h)`.
//!
//! [ristretto255]: https://datatracker.ietf.org/doc/html/rfc9496
#![doc = document_features::document_features!()]

use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::Identity,
};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha512;


// Re-exports in our public API
pub use gjkr_core::{
    chain, net, serde, Ciphersuite, DkgConfig, Field, FieldError, Group, GroupError,
    MemberGroup, MemberIndex,
};
pub use gjkr_core::gjkr::LocalMember;
pub use rand_core;

/// An error.
pub type Error = gjkr_core::Error;

/// An implementation of the GJKR(ristretto255, SHA-512) ciphersuite scalar field.
#[derive(Clone, Copy)]
pub struct RistrettoScalarField;

impl Field for RistrettoScalarField {
    type Scalar = Scalar;

    type Serialization = [u8; 32];

    fn zero() -> Self::Scalar {
        Scalar::ZERO
    }

    fn one() -> Self::Scalar {
        Scalar::ONE
    }

    fn invert(scalar: &Self::Scalar) -> Result<Self::Scalar, FieldError> {
        // [`curve25519_dalek::scalar::Scalar`]'s Eq/PartialEq does a constant-time comparison using
        // `ConstantTimeEq`
        if *scalar == <Self as Field>::zero() {
            Err(FieldError::InvalidZeroScalar)
        } else {
            Ok(scalar.invert())
        }
    }

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Scalar {
        Scalar::random(rng)
    }

    fn serialize(scalar: &Self::Scalar) -> Self::Serialization {
        scalar.to_bytes()
    }

    fn deserialize(buf: &Self::Serialization) -> Result<Self::Scalar, FieldError> {
        match Option::<Scalar>::from(Scalar::from_canonical_bytes(*buf)) {
            Some(s) => Ok(s),
            None => Err(FieldError::MalformedScalar),
        }
    }
}

/// An implementation of the GJKR(ristretto255, SHA-512) ciphersuite group.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RistrettoGroup;

impl Group for RistrettoGroup {
    type Field = RistrettoScalarField;

    type Element = RistrettoPoint;

    type Serialization = [u8; 32];

    fn identity() -> Self::Element {
        RistrettoPoint::identity()
    }

    fn generator() -> Self::Element {
        RISTRETTO_BASEPOINT_POINT
    }

    fn serialize(element: &Self::Element) -> Result<Self::Serialization, GroupError> {
        if *element == Self::identity() {
            return Err(GroupError::InvalidIdentityElement);
        }
        Ok(element.compress().to_bytes())
    }

    fn deserialize(buf: &Self::Serialization) -> Result<Self::Element, GroupError> {
        match CompressedRistretto(*buf).decompress() {
            Some(point) => {
                if point == Self::identity() {
                    Err(GroupError::InvalidIdentityElement)
                } else {
                    Ok(point)
                }
            }
            None => Err(GroupError::MalformedElement),
        }
    }
}

/// Context string of the ciphersuite, also the input hashed to the blinding
/// generator.
const CONTEXT_STRING: &str = "GJKR-RISTRETTO255-SHA512-v1";

/// An implementation of the GJKR(ristretto255, SHA-512) ciphersuite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ristretto255Sha512;

impl Ciphersuite for Ristretto255Sha512 {
    const ID: &'static str = CONTEXT_STRING;

    type Group = RistrettoGroup;

    fn blinding_generator() -> RistrettoPoint {
        RistrettoPoint::hash_from_bytes::<Sha512>(CONTEXT_STRING.as_bytes())
    }
}

type R = Ristretto255Sha512;

/// A member waiting for its peers' commitments and shares.
pub type CommittingMember = gjkr_core::gjkr::CommittingMember<R>;

/// A member answering and resolving accusations against dealt shares.
pub type JustifyingMember = gjkr_core::gjkr::JustifyingMember<R>;

/// A qualified member extracting the group public key.
pub type SharingMember = gjkr_core::gjkr::SharingMember<R>;

/// The outcome of a round: the group public key and the misbehaving members.
pub type DkgResult = gjkr_core::gjkr::DkgResult<R>;

/// The group public key.
pub type GroupPublicKey = gjkr_core::gjkr::GroupPublicKey<R>;

/// A member's private share of the group key, with the matching public data.
pub type KeyShare = gjkr_core::gjkr::KeyShare<R>;

/// A member's public key share, `g·x_i`.
pub type PublicKeyShare = gjkr_core::gjkr::PublicKeyShare<R>;

/// Any message exchanged during a round.
pub type ProtocolMessage = gjkr_core::gjkr::ProtocolMessage<R>;

/// A whole round run by one member over a transport and a chain.
pub type DkgRound<T, H> = gjkr_core::dkg::DkgRound<R, T, H>;

/// Messages exchanged during a round.
pub mod messages {
    use super::*;

    /// Broadcast Pedersen commitments to a member's polynomials.
    pub type MemberCommitmentsMessage = gjkr_core::gjkr::MemberCommitmentsMessage<R>;

    /// The share pair dealt to a single peer.
    pub type PeerSharesMessage = gjkr_core::gjkr::PeerSharesMessage<R>;

    /// A dealt share pair.
    pub type SharePair = gjkr_core::gjkr::SharePair<R>;

    /// Accusations against dealers of invalid shares.
    pub type SecretSharesAccusationsMessage = gjkr_core::gjkr::SecretSharesAccusationsMessage<R>;

    /// Shares revealed in answer to accusations.
    pub type SharesJustificationMessage = gjkr_core::gjkr::SharesJustificationMessage<R>;

    /// Broadcast Feldman commitments to a member's secret polynomial.
    pub type PublicKeySharePointsMessage = gjkr_core::gjkr::PublicKeySharePointsMessage<R>;

    /// Accusations against members whose Feldman commitments do not match.
    pub type PointsAccusationsMessage = gjkr_core::gjkr::PointsAccusationsMessage<R>;

    /// Shares revealed in answer to points accusations.
    pub type PointsJustificationMessage = gjkr_core::gjkr::PointsJustificationMessage<R>;

    /// Shares dealt by members disqualified after qualification.
    pub type DisqualifiedSharesMessage = gjkr_core::gjkr::DisqualifiedSharesMessage<R>;
}
