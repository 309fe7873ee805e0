//! The phase-tagged member states.

use core::fmt;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use super::{
    message::{
        DisqualifiedSharesMessage, MemberCommitmentsMessage, PeerSharesMessage,
        PointsAccusationsMessage, PointsJustificationMessage, PublicKeySharePointsMessage,
        SecretSharesAccusationsMessage, SharePair, SharesJustificationMessage,
    },
    result::{DkgResult, GroupPublicKey, KeyShare, PublicKeyShare},
    Exclusions, MemberCore,
};
use crate::{
    pedersen::{self, PedersenCommitment, PublicCoefficients},
    polynomial::{interpolate_secret, SecretPolynomial, Share},
    Ciphersuite, DkgConfig, Error, Field, Group, MemberIndex, Scalar,
};

/// A member that has not started the protocol yet.
#[derive(Clone, Debug)]
pub struct LocalMember {
    core: MemberCore,
}

impl LocalMember {
    /// Create the member with the given index.
    ///
    /// Fails if the index is not part of the configured group.
    pub fn new(index: MemberIndex, config: Arc<DkgConfig>) -> Result<Self, Error> {
        Ok(Self {
            core: MemberCore::new(index, config)?,
        })
    }

    /// The index of the member.
    pub fn index(&self) -> MemberIndex {
        self.core.index()
    }

    /// Generate the secret polynomial `a` and the blinding polynomial `b`,
    /// commit to their coefficients and evaluate them for every peer.
    ///
    /// Returns the [`CommittingMember`], one [`PeerSharesMessage`] per peer,
    /// which must be sent on a confidential channel, and the
    /// [`MemberCommitmentsMessage`], which must be broadcast.
    pub fn calculate_shares_and_commitments<C: Ciphersuite, R: RngCore + CryptoRng>(
        self,
        rng: &mut R,
    ) -> Result<
        (
            CommittingMember<C>,
            Vec<PeerSharesMessage<C>>,
            MemberCommitmentsMessage<C>,
        ),
        Error,
    > {
        let config = self.core.config().clone();
        let index = self.core.index();

        let secret_polynomial = SecretPolynomial::<C>::random(&config, rng);
        let blinding_polynomial = SecretPolynomial::<C>::random(&config, rng);
        let commitments = pedersen::commit(&secret_polynomial, &blinding_polynomial)?;

        let peer_shares = config
            .group()
            .peers_of(index)
            .map(|peer| {
                PeerSharesMessage::new(
                    index,
                    peer,
                    SharePair::new(
                        secret_polynomial.evaluate(peer),
                        blinding_polynomial.evaluate(peer),
                    ),
                )
            })
            .collect();
        let self_shares = SharePair::new(
            secret_polynomial.evaluate(index),
            blinding_polynomial.evaluate(index),
        );

        debug!(member = %index, "calculated shares and commitments");

        Ok((
            CommittingMember {
                core: self.core,
                secret_polynomial,
                blinding_polynomial,
                commitments: commitments.clone(),
                self_shares,
                received_shares: BTreeMap::new(),
                received_commitments: BTreeMap::new(),
                exclusions: Exclusions::default(),
            },
            peer_shares,
            MemberCommitmentsMessage::new(index, commitments),
        ))
    }
}

/// A member that dealt its shares and collects the peers' shares and
/// commitments.
///
/// # Security
///
/// The polynomials and every share MUST NOT leave the member, except when
/// revealed through the justification messages.
pub struct CommittingMember<C: Ciphersuite> {
    core: MemberCore,
    secret_polynomial: SecretPolynomial<C>,
    blinding_polynomial: SecretPolynomial<C>,
    commitments: PedersenCommitment<C>,
    /// `(s_ii, t_ii)`
    self_shares: SharePair<C>,
    /// `(s_ji, t_ji)` keyed by dealer `j`.
    received_shares: BTreeMap<MemberIndex, SharePair<C>>,
    received_commitments: BTreeMap<MemberIndex, PedersenCommitment<C>>,
    exclusions: Exclusions,
}

impl<C> fmt::Debug for CommittingMember<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommittingMember")
            .field("index", &self.core.index())
            .field("secret_polynomial", &"<redacted>")
            .field("exclusions", &self.exclusions)
            .finish_non_exhaustive()
    }
}

impl<C> CommittingMember<C>
where
    C: Ciphersuite,
{
    /// The index of the member.
    pub fn index(&self) -> MemberIndex {
        self.core.index()
    }

    /// The member's view of excluded peers.
    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    /// Record the commitments broadcast by a peer.
    ///
    /// Only the first message of each peer is recorded. A commitment vector of
    /// the wrong length disqualifies the peer.
    pub fn receive_commitments(&mut self, message: MemberCommitmentsMessage<C>) -> Result<(), Error> {
        let index = self.index();
        let sender = self.core.validate_peer(message.sender)?;
        if self.received_commitments.contains_key(&sender) {
            debug!(member = %index, %sender, "ignoring duplicate commitments");
            return Ok(());
        }
        if message.commitments.coefficients().len()
            != self.core.config().group().reconstruction_threshold()
        {
            self.exclusions.disqualify(index, sender);
            return Err(Error::IncorrectNumberOfCommitments);
        }
        self.received_commitments.insert(sender, message.commitments);
        Ok(())
    }

    /// Record the shares a peer dealt to this member.
    ///
    /// Only the first message of each peer is recorded.
    pub fn receive_shares(&mut self, message: PeerSharesMessage<C>) -> Result<(), Error> {
        let sender = self.core.validate_peer(message.sender)?;
        if message.receiver != self.index() {
            return Err(Error::UnexpectedReceiver {
                receiver: message.receiver,
            });
        }
        if self.received_shares.contains_key(&sender) {
            debug!(member = %self.index(), %sender, "ignoring duplicate shares");
            return Ok(());
        }
        self.received_shares.insert(sender, message.shares);
        Ok(())
    }

    /// Verify the received shares against the dealers' commitments.
    ///
    /// Peers that broadcast no commitments are marked as inactive. Dealers of
    /// invalid or missing shares are accused in the returned message, which
    /// must be broadcast.
    pub fn verify_received_shares_and_commitments(
        mut self,
    ) -> (JustifyingMember<C>, SecretSharesAccusationsMessage<C>) {
        let index = self.index();
        let mut accused = BTreeSet::new();

        let peers: Vec<_> = self.core.config().group().peers_of(index).collect();
        for peer in peers {
            if self.exclusions.is_excluded(peer) {
                continue;
            }
            let Some(commitments) = self.received_commitments.get(&peer) else {
                self.exclusions.mark_inactive(index, peer);
                continue;
            };
            let valid = self.received_shares.get(&peer).is_some_and(|shares| {
                commitments.verify(index, &shares.share_s, &shares.share_t)
            });
            if !valid {
                let error = Error::InvalidShare { culprit: peer };
                warn!(member = %index, %error, "accusing dealer");
                accused.insert(peer);
            }
        }

        let message = SecretSharesAccusationsMessage::new(index, accused);
        (
            JustifyingMember {
                core: self.core,
                secret_polynomial: self.secret_polynomial,
                blinding_polynomial: self.blinding_polynomial,
                commitments: self.commitments,
                self_shares: self.self_shares,
                received_shares: self.received_shares,
                received_commitments: self.received_commitments,
                exclusions: self.exclusions,
            },
            message,
        )
    }
}

/// A member that settles the accusations raised against dealers' shares.
pub struct JustifyingMember<C: Ciphersuite> {
    core: MemberCore,
    secret_polynomial: SecretPolynomial<C>,
    blinding_polynomial: SecretPolynomial<C>,
    commitments: PedersenCommitment<C>,
    self_shares: SharePair<C>,
    received_shares: BTreeMap<MemberIndex, SharePair<C>>,
    received_commitments: BTreeMap<MemberIndex, PedersenCommitment<C>>,
    exclusions: Exclusions,
}

impl<C> fmt::Debug for JustifyingMember<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JustifyingMember")
            .field("index", &self.core.index())
            .field("secret_polynomial", &"<redacted>")
            .field("exclusions", &self.exclusions)
            .finish_non_exhaustive()
    }
}

impl<C> JustifyingMember<C>
where
    C: Ciphersuite,
{
    /// The index of the member.
    pub fn index(&self) -> MemberIndex {
        self.core.index()
    }

    /// The member's view of excluded peers.
    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    /// Reveal the shares this member dealt to each member accusing it.
    ///
    /// Returns `None` if nobody accused this member. The message must be
    /// broadcast.
    pub fn justify(
        &self,
        accusations: &[SecretSharesAccusationsMessage<C>],
    ) -> Option<SharesJustificationMessage<C>> {
        let accusers = accusers_of(&self.core, accusations.iter().map(|m| (m.sender, &m.accused)));
        if accusers.is_empty() {
            return None;
        }
        info!(member = %self.index(), ?accusers, "revealing shares to answer accusations");
        Some(SharesJustificationMessage::new(
            self.index(),
            reveal_shares(&self.secret_polynomial, &self.blinding_polynomial, accusers),
        ))
    }

    /// Resolve every accusation raised in the group, including the member's
    /// own.
    ///
    /// For an accusation of `accused` by `accuser`, the shares revealed by
    /// `accused` are checked against its commitments. If they are valid the
    /// accuser lied and is disqualified; if this member is the accuser it
    /// adopts the revealed shares. If they are invalid or missing the accused
    /// is disqualified. Accusing oneself, an unknown member or an already
    /// excluded one disqualifies the accuser. Accusations sent by already
    /// excluded members are ignored.
    pub fn resolve_secret_shares_accusations(
        &mut self,
        accusations: &[SecretSharesAccusationsMessage<C>],
        justifications: &[SharesJustificationMessage<C>],
    ) {
        let index = self.index();
        let revealed = revealed_shares(
            &self.core,
            justifications.iter().map(|m| (m.sender, &m.justifications)),
        );
        let excluded_before = self.exclusions.clone();

        for (accuser, accused) in
            first_per_sender(&self.core, accusations.iter().map(|m| (m.sender, &m.accused)))
        {
            if excluded_before.is_excluded(accuser) {
                continue;
            }
            for accused in accused {
                if accused == &accuser
                    || !self.core.config().group().contains(*accused)
                    || excluded_before.is_excluded(*accused)
                {
                    self.exclusions.disqualify(index, accuser);
                    break;
                }
                let commitments = if *accused == index {
                    Some(&self.commitments)
                } else {
                    self.received_commitments.get(accused)
                };
                let shares = revealed.get(accused).and_then(|r| r.get(&accuser));
                match (commitments, shares) {
                    (Some(commitments), Some(shares))
                        if commitments.verify(accuser, &shares.share_s, &shares.share_t) =>
                    {
                        self.exclusions.disqualify(index, accuser);
                        if accuser == index {
                            self.received_shares.insert(*accused, *shares);
                        }
                    }
                    _ => self.exclusions.disqualify(index, *accused),
                }
            }
        }
    }

    /// Compute the qualified set and combine the shares dealt by its members
    /// into this member's share pair.
    ///
    /// Fails if fewer than `n - t` members qualified, in which case this
    /// member cannot compute a usable share.
    pub fn combine_shares(self) -> Result<SharingMember<C>, Error> {
        let index = self.index();
        let group = self.core.config().group();
        let qualified: BTreeSet<_> = group
            .member_indexes()
            .filter(|m| !self.exclusions.is_excluded(*m))
            .collect();

        if qualified.len() < group.minimum_qualified() {
            let error = Error::InsufficientQualifiedMembers {
                qualified: qualified.len(),
                required: group.minimum_qualified(),
            };
            warn!(member = %index, %error, "qualification failed");
            return Err(error);
        }

        let mut share_s = <<C::Group as Group>::Field>::zero();
        let mut share_t = <<C::Group as Group>::Field>::zero();
        for dealer in &qualified {
            let shares = if *dealer == index {
                &self.self_shares
            } else {
                self.received_shares
                    .get(dealer)
                    .ok_or(Error::InvalidShare { culprit: *dealer })?
            };
            share_s = share_s + shares.share_s.to_scalar();
            share_t = share_t + shares.share_t.to_scalar();
        }

        info!(member = %index, qualified = qualified.len(), "combined shares");

        Ok(SharingMember {
            public_coefficients: PublicCoefficients::from_polynomial(&self.secret_polynomial),
            core: self.core,
            secret_polynomial: self.secret_polynomial,
            blinding_polynomial: self.blinding_polynomial,
            commitments: self.commitments,
            received_shares: self.received_shares,
            received_commitments: self.received_commitments,
            exclusions: self.exclusions,
            qualified,
            shares: SharePair::new(Share::new(share_s), Share::new(share_t)),
            received_points: BTreeMap::new(),
        })
    }
}

/// A qualified member that extracts the group public key.
pub struct SharingMember<C: Ciphersuite> {
    core: MemberCore,
    secret_polynomial: SecretPolynomial<C>,
    blinding_polynomial: SecretPolynomial<C>,
    commitments: PedersenCommitment<C>,
    received_shares: BTreeMap<MemberIndex, SharePair<C>>,
    received_commitments: BTreeMap<MemberIndex, PedersenCommitment<C>>,
    exclusions: Exclusions,
    /// QUAL, as computed when combining shares.
    qualified: BTreeSet<MemberIndex>,
    /// `(x_i, x'_i)`, the sums of the shares dealt by the qualified members.
    shares: SharePair<C>,
    /// `A_ik`
    public_coefficients: PublicCoefficients<C>,
    received_points: BTreeMap<MemberIndex, PublicCoefficients<C>>,
}

impl<C> fmt::Debug for SharingMember<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharingMember")
            .field("index", &self.core.index())
            .field("secret_polynomial", &"<redacted>")
            .field("exclusions", &self.exclusions)
            .finish_non_exhaustive()
    }
}

impl<C> SharingMember<C>
where
    C: Ciphersuite,
{
    /// The index of the member.
    pub fn index(&self) -> MemberIndex {
        self.core.index()
    }

    /// The member's view of excluded peers.
    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    /// The qualified set.
    pub fn qualified(&self) -> &BTreeSet<MemberIndex> {
        &self.qualified
    }

    /// The message revealing this member's public key share points `A_ik`,
    /// which must be broadcast.
    pub fn public_key_share_points(&self) -> PublicKeySharePointsMessage<C> {
        PublicKeySharePointsMessage::new(self.index(), self.public_coefficients.clone())
    }

    /// Record the public key share points broadcast by a qualified peer.
    ///
    /// Only the first message of each peer is recorded. Points from members
    /// outside the qualified set are ignored. A vector of the wrong length
    /// disqualifies the peer.
    pub fn receive_public_key_share_points(
        &mut self,
        message: PublicKeySharePointsMessage<C>,
    ) -> Result<(), Error> {
        let index = self.index();
        let sender = self.core.validate_peer(message.sender)?;
        if !self.qualified.contains(&sender) {
            debug!(member = %index, %sender, "ignoring points of unqualified member");
            return Ok(());
        }
        if self.received_points.contains_key(&sender) {
            debug!(member = %index, %sender, "ignoring duplicate points");
            return Ok(());
        }
        if message.points.coefficients().len()
            != self.core.config().group().reconstruction_threshold()
        {
            self.exclusions.disqualify(index, sender);
            return Err(Error::IncorrectNumberOfCommitments);
        }
        self.received_points.insert(sender, message.points);
        Ok(())
    }

    /// Verify the shares dealt by each qualified peer against its public key
    /// share points.
    ///
    /// Qualified peers that revealed no points are marked as inactive. Peers
    /// whose points do not match are accused in the returned message, which
    /// must be broadcast.
    pub fn verify_public_key_share_points(&mut self) -> PointsAccusationsMessage<C> {
        let index = self.index();
        let mut accused = BTreeSet::new();

        for peer in self.qualified.iter().filter(|m| **m != index) {
            if self.exclusions.is_excluded(*peer) {
                continue;
            }
            let Some(points) = self.received_points.get(peer) else {
                self.exclusions.mark_inactive(index, *peer);
                continue;
            };
            let valid = self
                .received_shares
                .get(peer)
                .is_some_and(|shares| points.verify(index, &shares.share_s));
            if !valid {
                warn!(member = %index, accused = %peer, "public key share points do not match the share");
                accused.insert(*peer);
            }
        }

        PointsAccusationsMessage::new(index, accused)
    }

    /// Reveal the shares this member dealt to each member accusing its public
    /// key share points.
    ///
    /// Returns `None` if nobody accused this member. The message must be
    /// broadcast.
    pub fn justify_points(
        &self,
        accusations: &[PointsAccusationsMessage<C>],
    ) -> Option<PointsJustificationMessage<C>> {
        let accusers = accusers_of(&self.core, accusations.iter().map(|m| (m.sender, &m.accused)));
        if accusers.is_empty() {
            return None;
        }
        info!(member = %self.index(), ?accusers, "revealing shares to answer points accusations");
        Some(PointsJustificationMessage::new(
            self.index(),
            reveal_shares(&self.secret_polynomial, &self.blinding_polynomial, accusers),
        ))
    }

    /// Resolve every accusation against public key share points raised in
    /// the group, including the member's own.
    ///
    /// The accused is disqualified if the shares it reveals are missing, do
    /// not match its Pedersen commitments, or do not match its public key
    /// share points; otherwise the accuser is disqualified. Only members of
    /// the qualified set that are still active may accuse or be accused.
    pub fn resolve_public_key_share_points_accusations(
        &mut self,
        accusations: &[PointsAccusationsMessage<C>],
        justifications: &[PointsJustificationMessage<C>],
    ) {
        let index = self.index();
        let revealed = revealed_shares(
            &self.core,
            justifications.iter().map(|m| (m.sender, &m.justifications)),
        );
        let excluded_before = self.exclusions.clone();
        let is_active =
            |m: &MemberIndex| self.qualified.contains(m) && !excluded_before.is_excluded(*m);

        for (accuser, accused) in
            first_per_sender(&self.core, accusations.iter().map(|m| (m.sender, &m.accused)))
        {
            if !is_active(&accuser) {
                continue;
            }
            for accused in accused {
                if accused == &accuser || !is_active(accused) {
                    self.exclusions.disqualify(index, accuser);
                    break;
                }
                let (commitments, points) = if *accused == index {
                    (Some(&self.commitments), Some(&self.public_coefficients))
                } else {
                    (
                        self.received_commitments.get(accused),
                        self.received_points.get(accused),
                    )
                };
                let shares = revealed.get(accused).and_then(|r| r.get(&accuser));
                match (commitments, points, shares) {
                    (Some(commitments), Some(points), Some(shares))
                        if commitments.verify(accuser, &shares.share_s, &shares.share_t)
                            && points.verify(accuser, &shares.share_s) =>
                    {
                        self.exclusions.disqualify(index, accuser)
                    }
                    _ => self.exclusions.disqualify(index, *accused),
                }
            }
        }
    }

    /// Qualified members excluded after qualification, whose secrets must be
    /// reconstructed.
    fn disqualified_after_qualification(&self) -> BTreeSet<MemberIndex> {
        self.qualified
            .iter()
            .filter(|m| self.exclusions.is_excluded(**m))
            .copied()
            .collect()
    }

    /// Reveal the shares this member received from qualified members that
    /// were excluded afterwards.
    ///
    /// Returns `None` if there is nothing to reveal. The message must be
    /// broadcast.
    pub fn reveal_disqualified_shares(&self) -> Option<DisqualifiedSharesMessage<C>> {
        let shares: BTreeMap<_, _> = self
            .disqualified_after_qualification()
            .into_iter()
            .filter_map(|m| self.received_shares.get(&m).map(|shares| (m, *shares)))
            .collect();
        if shares.is_empty() {
            return None;
        }
        Some(DisqualifiedSharesMessage::new(self.index(), shares))
    }

    /// Reconstruct the secrets of qualified members excluded after
    /// qualification and compute the group public key.
    ///
    /// Revealed shares that do not match the dealer's commitments are
    /// ignored. Fails if fewer than `t + 1` valid shares are available for
    /// some member.
    pub fn finalize(
        mut self,
        revealed: &[DisqualifiedSharesMessage<C>],
    ) -> Result<(DkgResult<C>, KeyShare<C>), Error> {
        let index = self.index();
        let reconstructed = self.disqualified_after_qualification();

        let mut group_public_key = <C::Group>::identity();
        for dealer in self.qualified.iter().filter(|m| !reconstructed.contains(*m)) {
            let points = if *dealer == index {
                &self.public_coefficients
            } else {
                self.received_points
                    .get(dealer)
                    .ok_or(Error::IncorrectNumberOfCommitments)?
            };
            group_public_key = group_public_key + points.constant_term()?;
        }

        // Revealed shares keyed by dealer, then by holder.
        let mut revealed_by_dealer: BTreeMap<MemberIndex, BTreeMap<MemberIndex, SharePair<C>>> =
            BTreeMap::new();
        for (holder, shares) in
            first_per_sender(&self.core, revealed.iter().map(|m| (m.sender, &m.shares)))
        {
            for (dealer, pair) in shares {
                revealed_by_dealer
                    .entry(*dealer)
                    .or_default()
                    .insert(holder, *pair);
            }
        }
        for dealer in &reconstructed {
            let secret = self.reconstruct_secret(*dealer, revealed_by_dealer.get(dealer))?;
            info!(member = %index, %dealer, "reconstructed secret of disqualified member");
            group_public_key = group_public_key + <C::Group>::generator() * secret;
        }

        let private_share = self.shares.share_s;
        let public_share = <C::Group>::generator() * private_share.to_scalar();
        let group_public_key = GroupPublicKey::new(group_public_key);
        let misbehaved = self.exclusions.misbehaved();

        info!(
            member = %index,
            group_public_key = ?group_public_key,
            ?misbehaved,
            "key generation finished"
        );

        let result = DkgResult::new(group_public_key, misbehaved);
        let key_share = KeyShare::new(
            index,
            private_share,
            PublicKeyShare::new(public_share),
            group_public_key,
        );

        self.secret_polynomial.zeroize();
        self.blinding_polynomial.zeroize();

        Ok((result, key_share))
    }

    /// Recover `z_m = a_m0` from the valid shares dealt by `dealer`.
    fn reconstruct_secret(
        &self,
        dealer: MemberIndex,
        revealed: Option<&BTreeMap<MemberIndex, SharePair<C>>>,
    ) -> Result<Scalar<C>, Error> {
        let index = self.index();
        if dealer == index {
            return self
                .secret_polynomial
                .coefficients
                .first()
                .copied()
                .ok_or(Error::IncorrectNumberOfCommitments);
        }
        let commitments = self
            .received_commitments
            .get(&dealer)
            .ok_or(Error::InsufficientRevealedShares {
                disqualified: dealer,
            })?;

        // Shares held by this member were verified when received; revealed
        // ones are checked now.
        let mut points: BTreeMap<MemberIndex, Scalar<C>> = self
            .received_shares
            .get(&dealer)
            .map(|shares| (index, shares.share_s.to_scalar()))
            .into_iter()
            .collect();
        for (holder, shares) in revealed.into_iter().flatten() {
            if *holder == dealer || points.contains_key(holder) {
                continue;
            }
            if commitments.verify(*holder, &shares.share_s, &shares.share_t) {
                points.insert(*holder, shares.share_s.to_scalar());
            } else {
                warn!(member = %index, %holder, %dealer, "ignoring invalid revealed share");
            }
        }

        let threshold = self.core.config().group().reconstruction_threshold();
        if points.len() < threshold {
            return Err(Error::InsufficientRevealedShares {
                disqualified: dealer,
            });
        }
        let points: BTreeMap<_, _> = points.into_iter().take(threshold).collect();
        interpolate_secret::<C>(&points)
    }
}

/// Keep the first message of each known sender, in ascending sender order.
fn first_per_sender<'a, T: 'a>(
    core: &MemberCore,
    messages: impl Iterator<Item = (MemberIndex, &'a T)>,
) -> BTreeMap<MemberIndex, &'a T> {
    let mut first = BTreeMap::new();
    for (sender, message) in messages {
        if !core.config().group().contains(sender) {
            debug!(member = %core.index(), %sender, "ignoring message from unknown member");
            continue;
        }
        first.entry(sender).or_insert(message);
    }
    first
}

/// The members accusing the local member.
fn accusers_of<'a>(
    core: &MemberCore,
    accusations: impl Iterator<Item = (MemberIndex, &'a BTreeSet<MemberIndex>)>,
) -> BTreeSet<MemberIndex> {
    first_per_sender(core, accusations)
        .into_iter()
        .filter(|(accuser, accused)| *accuser != core.index() && accused.contains(&core.index()))
        .map(|(accuser, _)| accuser)
        .collect()
}

/// Revealed shares keyed by dealer, then by the member they were dealt to.
fn revealed_shares<'a, C: Ciphersuite>(
    core: &MemberCore,
    messages: impl Iterator<Item = (MemberIndex, &'a BTreeMap<MemberIndex, SharePair<C>>)>,
) -> BTreeMap<MemberIndex, BTreeMap<MemberIndex, SharePair<C>>> {
    first_per_sender(core, messages)
        .into_iter()
        .map(|(sender, shares)| (sender, shares.clone()))
        .collect()
}

/// Evaluate both polynomials at each accuser's index.
fn reveal_shares<C: Ciphersuite>(
    secret_polynomial: &SecretPolynomial<C>,
    blinding_polynomial: &SecretPolynomial<C>,
    accusers: BTreeSet<MemberIndex>,
) -> BTreeMap<MemberIndex, SharePair<C>> {
    accusers
        .into_iter()
        .map(|accuser| {
            (
                accuser,
                SharePair::new(
                    secret_polynomial.evaluate(accuser),
                    blinding_polynomial.evaluate(accuser),
                ),
            )
        })
        .collect()
}
