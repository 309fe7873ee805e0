//! The output of the protocol.

use core::fmt::{self, Debug};
use std::collections::BTreeSet;

use derive_getters::Getters;
use zeroize::Zeroize;

use crate::{
    chain::DkgResultSubmission,
    polynomial::Share,
    serialization::{Deserialize, Serialize},
    Ciphersuite, Element, Error, Header, MemberIndex, SerializableElement,
};

/// The public key of the group, `y = Σ_{j ∈ QUAL} g·a_j0`.
#[derive(Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(transparent)]
pub struct GroupPublicKey<C: Ciphersuite>(pub(crate) SerializableElement<C>);

impl<C> GroupPublicKey<C>
where
    C: Ciphersuite,
{
    /// Create a new GroupPublicKey from the given element.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    #[cfg_attr(docsrs, doc(cfg(feature = "internals")))]
    pub(crate) fn new(element: Element<C>) -> Self {
        Self(SerializableElement(element))
    }

    /// Return the underlying element.
    pub fn to_element(self) -> Element<C> {
        self.0 .0
    }

    /// Deserialize from bytes
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(SerializableElement::deserialize(bytes)?))
    }

    /// Serialize to bytes
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.0.serialize()
    }
}

impl<C> Debug for GroupPublicKey<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupPublicKey")
            .field(
                &self
                    .serialize()
                    .map(hex::encode)
                    .unwrap_or("<invalid>".to_string()),
            )
            .finish()
    }
}

/// The public counterpart of a member's private share, `g·x_i`.
#[derive(Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(transparent)]
pub struct PublicKeyShare<C: Ciphersuite>(pub(crate) SerializableElement<C>);

impl<C> PublicKeyShare<C>
where
    C: Ciphersuite,
{
    pub(crate) fn new(element: Element<C>) -> Self {
        Self(SerializableElement(element))
    }

    /// Return the underlying element.
    pub fn to_element(self) -> Element<C> {
        self.0 .0
    }

    /// Serialize to bytes
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.0.serialize()
    }
}

impl<C> Debug for PublicKeyShare<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKeyShare")
            .field(
                &self
                    .serialize()
                    .map(hex::encode)
                    .unwrap_or("<invalid>".to_string()),
            )
            .finish()
    }
}

/// The result of a key generation round, as computed by one member.
///
/// Two results are equal if their group public keys serialize to the same
/// bytes; the misbehaved sets are not compared.
#[derive(Clone, Debug, Getters)]
pub struct DkgResult<C: Ciphersuite> {
    /// The group public key.
    group_public_key: GroupPublicKey<C>,
    /// The members excluded from the group, disqualified or inactive.
    misbehaved: BTreeSet<MemberIndex>,
}

impl<C> DkgResult<C>
where
    C: Ciphersuite,
{
    /// Create a new [`DkgResult`].
    pub fn new(group_public_key: GroupPublicKey<C>, misbehaved: BTreeSet<MemberIndex>) -> Self {
        Self {
            group_public_key,
            misbehaved,
        }
    }

    /// The group public key as published on chain.
    pub fn group_public_key_bytes(&self) -> Result<Vec<u8>, Error> {
        self.group_public_key.serialize()
    }

    /// The misbehaved members as published on chain: one byte per member
    /// index, in ascending order.
    pub fn misbehaved_bytes(&self) -> Vec<u8> {
        self.misbehaved.iter().map(|index| index.get()).collect()
    }

    /// The submission publishing this result.
    pub fn to_submission(&self) -> Result<DkgResultSubmission, Error> {
        Ok(DkgResultSubmission::new(
            self.group_public_key_bytes()?,
            self.misbehaved_bytes(),
        ))
    }
}

impl<C> PartialEq for DkgResult<C>
where
    C: Ciphersuite,
{
    fn eq(&self, other: &Self) -> bool {
        match (self.group_public_key_bytes(), other.group_public_key_bytes()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// The private output of a member: its share of the group secret key.
///
/// # Security
///
/// The private share MUST NOT leave the member.
#[derive(Clone, Debug, PartialEq, Eq, Getters, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub struct KeyShare<C: Ciphersuite> {
    /// Serialization header
    #[getter(skip)]
    pub(crate) header: Header<C>,
    /// The member holding the share.
    pub(crate) index: MemberIndex,
    /// `x_i = Σ_{j ∈ QUAL} s_ji`
    pub(crate) private_share: Share<C>,
    /// `g·x_i`
    pub(crate) public_share: PublicKeyShare<C>,
    /// The group public key.
    pub(crate) group_public_key: GroupPublicKey<C>,
}

impl<C> KeyShare<C>
where
    C: Ciphersuite,
{
    pub(crate) fn new(
        index: MemberIndex,
        private_share: Share<C>,
        public_share: PublicKeyShare<C>,
        group_public_key: GroupPublicKey<C>,
    ) -> Self {
        Self {
            header: Header::default(),
            index,
            private_share,
            public_share,
            group_public_key,
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

impl<C> Zeroize for KeyShare<C>
where
    C: Ciphersuite,
{
    fn zeroize(&mut self) {
        self.private_share.zeroize();
    }
}
