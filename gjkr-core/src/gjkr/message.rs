//! Messages exchanged between members during the protocol.

use std::collections::{BTreeMap, BTreeSet};

use derive_getters::Getters;

use crate::{
    pedersen::{PedersenCommitment, PublicCoefficients},
    polynomial::Share,
    serialization::{Deserialize, Serialize},
    Ciphersuite, Error, Header, MemberIndex,
};

/// Shares `(s, t)` of the secret and blinding polynomials of a dealer,
/// evaluated at one member's index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct SharePair<C: Ciphersuite> {
    /// The share of the secret polynomial, `s_ij`.
    pub(crate) share_s: Share<C>,
    /// The share of the blinding polynomial, `t_ij`.
    pub(crate) share_t: Share<C>,
}

impl<C> SharePair<C>
where
    C: Ciphersuite,
{
    /// Create a new [`SharePair`].
    pub fn new(share_s: Share<C>, share_t: Share<C>) -> Self {
        Self { share_s, share_t }
    }
}

/// The Pedersen commitments of a member to its polynomial coefficients.
///
/// It must be sent over a *broadcast* channel: members must all hold the same
/// commitments of a given dealer.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct MemberCommitmentsMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The dealer.
    pub(crate) sender: MemberIndex,
    /// The commitments `C_ik`.
    pub(crate) commitments: PedersenCommitment<C>,
}

impl<C> MemberCommitmentsMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`MemberCommitmentsMessage`].
    pub fn new(sender: MemberIndex, commitments: PedersenCommitment<C>) -> Self {
        Self {
            header: Header::default(),
            sender,
            commitments,
        }
    }
}

/// The shares a dealer computed for one peer.
///
/// # Security
///
/// The message must be sent on a *confidential* and *authenticated* channel.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct PeerSharesMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The dealer.
    pub(crate) sender: MemberIndex,
    /// The member the shares are for.
    pub(crate) receiver: MemberIndex,
    /// The shares `(s_ij, t_ij)`.
    pub(crate) shares: SharePair<C>,
}

impl<C> PeerSharesMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`PeerSharesMessage`].
    pub fn new(sender: MemberIndex, receiver: MemberIndex, shares: SharePair<C>) -> Self {
        Self {
            header: Header::default(),
            sender,
            receiver,
            shares,
        }
    }
}

/// The dealers a member accuses of sending it invalid shares, or no shares at
/// all.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct SecretSharesAccusationsMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The accuser.
    pub(crate) sender: MemberIndex,
    /// The accused dealers.
    pub(crate) accused: BTreeSet<MemberIndex>,
}

impl<C> SecretSharesAccusationsMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`SecretSharesAccusationsMessage`].
    pub fn new(sender: MemberIndex, accused: BTreeSet<MemberIndex>) -> Self {
        Self {
            header: Header::default(),
            sender,
            accused,
        }
    }
}

/// The shares an accused dealer reveals in the clear to answer accusations,
/// keyed by accuser.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct SharesJustificationMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The accused dealer.
    pub(crate) sender: MemberIndex,
    /// The shares the dealer sent to each accuser.
    pub(crate) justifications: BTreeMap<MemberIndex, SharePair<C>>,
}

impl<C> SharesJustificationMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`SharesJustificationMessage`].
    pub fn new(sender: MemberIndex, justifications: BTreeMap<MemberIndex, SharePair<C>>) -> Self {
        Self {
            header: Header::default(),
            sender,
            justifications,
        }
    }
}

/// The Feldman commitments `A_ik = g·a_ik` of a qualified member.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct PublicKeySharePointsMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The dealer.
    pub(crate) sender: MemberIndex,
    /// The public coefficients of the dealer's secret polynomial.
    pub(crate) points: PublicCoefficients<C>,
}

impl<C> PublicKeySharePointsMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`PublicKeySharePointsMessage`].
    pub fn new(sender: MemberIndex, points: PublicCoefficients<C>) -> Self {
        Self {
            header: Header::default(),
            sender,
            points,
        }
    }
}

/// The dealers a member accuses of publishing points inconsistent with the
/// shares it received.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct PointsAccusationsMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The accuser.
    pub(crate) sender: MemberIndex,
    /// The accused dealers.
    pub(crate) accused: BTreeSet<MemberIndex>,
}

impl<C> PointsAccusationsMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`PointsAccusationsMessage`].
    pub fn new(sender: MemberIndex, accused: BTreeSet<MemberIndex>) -> Self {
        Self {
            header: Header::default(),
            sender,
            accused,
        }
    }
}

/// The shares an accused dealer reveals to answer accusations against its
/// public key share points, keyed by accuser.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct PointsJustificationMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The accused dealer.
    pub(crate) sender: MemberIndex,
    /// The shares the dealer sent to each accuser.
    pub(crate) justifications: BTreeMap<MemberIndex, SharePair<C>>,
}

impl<C> PointsJustificationMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`PointsJustificationMessage`].
    pub fn new(sender: MemberIndex, justifications: BTreeMap<MemberIndex, SharePair<C>>) -> Self {
        Self {
            header: Header::default(),
            sender,
            justifications,
        }
    }
}

/// The shares a member received from qualified members that were
/// disqualified afterwards, revealed so that their secrets can be
/// reconstructed. Keyed by the disqualified member.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct DisqualifiedSharesMessage<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The revealing member.
    pub(crate) sender: MemberIndex,
    /// The shares received from each disqualified member.
    pub(crate) shares: BTreeMap<MemberIndex, SharePair<C>>,
}

impl<C> DisqualifiedSharesMessage<C>
where
    C: Ciphersuite,
{
    /// Create a new [`DisqualifiedSharesMessage`].
    pub fn new(sender: MemberIndex, shares: BTreeMap<MemberIndex, SharePair<C>>) -> Self {
        Self {
            header: Header::default(),
            sender,
            shares,
        }
    }
}

/// Any message of the protocol, as sent over the wire.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
pub enum ProtocolMessage<C: Ciphersuite> {
    /// See [`MemberCommitmentsMessage`].
    MemberCommitments(MemberCommitmentsMessage<C>),
    /// See [`PeerSharesMessage`].
    PeerShares(PeerSharesMessage<C>),
    /// See [`SecretSharesAccusationsMessage`].
    SecretSharesAccusations(SecretSharesAccusationsMessage<C>),
    /// See [`SharesJustificationMessage`].
    SharesJustification(SharesJustificationMessage<C>),
    /// See [`PublicKeySharePointsMessage`].
    PublicKeySharePoints(PublicKeySharePointsMessage<C>),
    /// See [`PointsAccusationsMessage`].
    PointsAccusations(PointsAccusationsMessage<C>),
    /// See [`PointsJustificationMessage`].
    PointsJustification(PointsJustificationMessage<C>),
    /// See [`DisqualifiedSharesMessage`].
    DisqualifiedShares(DisqualifiedSharesMessage<C>),
}

impl<C> ProtocolMessage<C>
where
    C: Ciphersuite,
{
    /// The member that claims to have sent the message.
    pub fn sender(&self) -> MemberIndex {
        match self {
            ProtocolMessage::MemberCommitments(m) => m.sender,
            ProtocolMessage::PeerShares(m) => m.sender,
            ProtocolMessage::SecretSharesAccusations(m) => m.sender,
            ProtocolMessage::SharesJustification(m) => m.sender,
            ProtocolMessage::PublicKeySharePoints(m) => m.sender,
            ProtocolMessage::PointsAccusations(m) => m.sender,
            ProtocolMessage::PointsJustification(m) => m.sender,
            ProtocolMessage::DisqualifiedShares(m) => m.sender,
        }
    }

    /// Serialize the struct into a Vec.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        Serialize::serialize(&self)
    }

    /// Deserialize the struct from a slice of bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Deserialize::deserialize(bytes)
    }
}

macro_rules! impl_protocol_message {
    ($($message:ident => $variant:ident),+ $(,)?) => {
        $(
            impl<C> $message<C>
            where
                C: Ciphersuite,
            {
                /// Serialize the struct into a Vec.
                pub fn serialize(&self) -> Result<Vec<u8>, Error> {
                    Serialize::serialize(&self)
                }

                /// Deserialize the struct from a slice of bytes.
                pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
                    Deserialize::deserialize(bytes)
                }
            }

            impl<C> From<$message<C>> for ProtocolMessage<C>
            where
                C: Ciphersuite,
            {
                fn from(message: $message<C>) -> Self {
                    ProtocolMessage::$variant(message)
                }
            }
        )+
    };
}

impl_protocol_message! {
    MemberCommitmentsMessage => MemberCommitments,
    PeerSharesMessage => PeerShares,
    SecretSharesAccusationsMessage => SecretSharesAccusations,
    SharesJustificationMessage => SharesJustification,
    PublicKeySharePointsMessage => PublicKeySharePoints,
    PointsAccusationsMessage => PointsAccusations,
    PointsJustificationMessage => PointsJustification,
    DisqualifiedSharesMessage => DisqualifiedShares,
}
