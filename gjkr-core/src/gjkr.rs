//! The GJKR member protocol.
//!
//! This implements the distributed key generation of [Gennaro, Jarecki,
//! Krawczyk and Rabin][GJKR], in which every member deals a secret with
//! Pedersen's verifiable secret sharing and the group public key is extracted
//! afterwards with Feldman commitments. Unlike plain Pedersen DKG, the second
//! extraction phase keeps a malicious member from biasing the group key: the
//! qualified set is fixed while the commitments still hide every secret.
//!
//! A member moves linearly through phase-tagged states, each transition
//! consuming the previous state:
//!
//! 1. [`LocalMember`] generates its polynomials, commitments and shares.
//! 2. [`CommittingMember`] collects the peers' commitments and shares,
//!    verifies them and accuses the dealers of invalid shares.
//! 3. [`JustifyingMember`] answers accusations against itself, resolves every
//!    accusation in the group and computes the qualified set.
//! 4. [`SharingMember`] reveals its public key share points, resolves
//!    accusations against them, reconstructs the secrets of members
//!    disqualified in that phase and finally outputs the [`DkgResult`] and the
//!    member's [`KeyShare`].
//!
//! Message exchange is left to the caller; see [`crate::dkg`] for a driver
//! running the protocol over a [`crate::net::Transport`].
//!
//! [GJKR]: https://link.springer.com/article/10.1007/s00145-006-0347-3

use std::{collections::BTreeSet, sync::Arc};

use tracing::{debug, warn};

use crate::{DkgConfig, Error, MemberIndex};

mod member;
mod message;
mod result;

pub use member::{CommittingMember, JustifyingMember, LocalMember, SharingMember};
pub use message::{
    DisqualifiedSharesMessage, MemberCommitmentsMessage, PeerSharesMessage,
    PointsAccusationsMessage, PointsJustificationMessage, ProtocolMessage,
    PublicKeySharePointsMessage, SecretSharesAccusationsMessage, SharePair,
    SharesJustificationMessage,
};
pub use result::{DkgResult, GroupPublicKey, KeyShare, PublicKeyShare};

/// The identity of a member, shared by every phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MemberCore {
    index: MemberIndex,
    config: Arc<DkgConfig>,
}

impl MemberCore {
    pub(crate) fn new(index: MemberIndex, config: Arc<DkgConfig>) -> Result<Self, Error> {
        let index = config.group().validate(index)?;
        Ok(Self { index, config })
    }

    pub(crate) fn index(&self) -> MemberIndex {
        self.index
    }

    pub(crate) fn config(&self) -> &Arc<DkgConfig> {
        &self.config
    }

    /// Check that `sender` is another member of the group.
    pub(crate) fn validate_peer(&self, sender: MemberIndex) -> Result<MemberIndex, Error> {
        let sender = self.config.group().validate(sender)?;
        if sender == self.index {
            return Err(Error::InvalidPeer { index: sender });
        }
        Ok(sender)
    }
}

/// The members a member has excluded from the round.
///
/// `disqualified` members provably misbehaved; `inactive` ones did not send
/// a message they had to send within the phase window. Both end up in the
/// published misbehaved set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exclusions {
    disqualified: BTreeSet<MemberIndex>,
    inactive: BTreeSet<MemberIndex>,
}

impl Exclusions {
    /// Mark `index` as disqualified.
    pub(crate) fn disqualify(&mut self, member: MemberIndex, index: MemberIndex) {
        if self.disqualified.insert(index) {
            warn!(member = %member, disqualified = %index, "member disqualified");
        }
    }

    /// Mark `index` as inactive.
    pub(crate) fn mark_inactive(&mut self, member: MemberIndex, index: MemberIndex) {
        if self.inactive.insert(index) {
            debug!(member = %member, inactive = %index, "member marked as inactive");
        }
    }

    /// Whether `index` is excluded for any reason.
    pub fn is_excluded(&self, index: MemberIndex) -> bool {
        self.disqualified.contains(&index) || self.inactive.contains(&index)
    }

    /// Members that provably misbehaved.
    pub fn disqualified(&self) -> &BTreeSet<MemberIndex> {
        &self.disqualified
    }

    /// Members that did not respond in time.
    pub fn inactive(&self) -> &BTreeSet<MemberIndex> {
        &self.inactive
    }

    /// All excluded members.
    pub fn misbehaved(&self) -> BTreeSet<MemberIndex> {
        self.disqualified.union(&self.inactive).copied().collect()
    }
}
