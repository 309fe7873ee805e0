//! Running a member through a whole key generation round.
//!
//! [`DkgRound`] drives a member of the [`crate::gjkr`] protocol over a
//! [`Transport`], publishes its result on chain and decides whether the member
//! stays in the group. Every phase lasts a fixed number of blocks, counted
//! from the block the round starts at, so members stay aligned without
//! sharing a clock.

use std::{collections::BTreeMap, sync::Arc};

use rand_core::{CryptoRng, RngCore};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::{
    chain::{BlockCounter, DkgResultSubmission, ThresholdRelay},
    gjkr::{KeyShare, LocalMember, ProtocolMessage},
    net::{Envelope, Transport},
    Ciphersuite, DkgConfig, Error, MemberIndex,
};

pub mod fate;
pub mod publish;

pub use fate::{decide_member_fate, wait_for_submission};
pub use publish::publish_result;

/// The message exchange phases of a round, in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Commitments,
    SharesAccusations,
    SharesJustification,
    PublicKeySharePoints,
    PointsAccusations,
    PointsJustification,
    DisqualifiedShares,
}

impl Phase {
    const COUNT: u64 = 7;

    fn of<C: Ciphersuite>(message: &ProtocolMessage<C>) -> Self {
        match message {
            ProtocolMessage::MemberCommitments(_) | ProtocolMessage::PeerShares(_) => {
                Phase::Commitments
            }
            ProtocolMessage::SecretSharesAccusations(_) => Phase::SharesAccusations,
            ProtocolMessage::SharesJustification(_) => Phase::SharesJustification,
            ProtocolMessage::PublicKeySharePoints(_) => Phase::PublicKeySharePoints,
            ProtocolMessage::PointsAccusations(_) => Phase::PointsAccusations,
            ProtocolMessage::PointsJustification(_) => Phase::PointsJustification,
            ProtocolMessage::DisqualifiedShares(_) => Phase::DisqualifiedShares,
        }
    }

    /// One-based position of the phase.
    fn number(self) -> u64 {
        self as u64 + 1
    }
}

/// One member's participation in a key generation round.
pub struct DkgRound<C: Ciphersuite, T, H> {
    member_index: MemberIndex,
    config: Arc<DkgConfig>,
    start_block_height: u64,
    transport: T,
    incoming: mpsc::UnboundedReceiver<Envelope>,
    chain: H,
    /// Messages received ahead of their phase.
    buffered: BTreeMap<Phase, Vec<ProtocolMessage<C>>>,
}

impl<C, T, H> DkgRound<C, T, H>
where
    C: Ciphersuite,
    T: Transport,
    H: BlockCounter + ThresholdRelay,
{
    /// Prepare the round of `member_index`, starting at `start_block_height`.
    ///
    /// `incoming` must deliver the messages the transport receives for the
    /// member.
    pub fn new(
        member_index: MemberIndex,
        config: Arc<DkgConfig>,
        start_block_height: u64,
        transport: T,
        incoming: mpsc::UnboundedReceiver<Envelope>,
        chain: H,
    ) -> Self {
        Self {
            member_index,
            config,
            start_block_height,
            transport,
            incoming,
            chain,
            buffered: BTreeMap::new(),
        }
    }

    /// The block at which `phase` closes.
    fn phase_end(&self, phase: Phase) -> u64 {
        self.start_block_height + phase.number() * self.config.phase_duration_blocks()
    }

    /// The block at which members start publishing their results, once every
    /// phase closed.
    pub fn publication_start_block_height(&self) -> u64 {
        self.start_block_height + Phase::COUNT * self.config.phase_duration_blocks()
    }

    /// Run the round.
    ///
    /// Returns the member's key share if the member stays in the group.
    /// A member that could not qualify does not publish anything but still
    /// waits for the group's result before returning
    /// [`Error::InsufficientQualifiedMembers`].
    #[instrument(skip_all, fields(member = %self.member_index))]
    pub async fn execute<R: RngCore + CryptoRng>(mut self, mut rng: R) -> Result<KeyShare<C>, Error> {
        let mut submissions = self.chain.on_dkg_result_submitted();
        let member = LocalMember::new(self.member_index, self.config.clone())?;
        self.chain.wait_for_block_height(self.start_block_height).await?;
        info!(start = self.start_block_height, "starting key generation");

        // Shares and commitments.
        let (mut member, peer_shares, commitments) =
            member.calculate_shares_and_commitments::<C, _>(&mut rng)?;
        self.broadcast(commitments).await?;
        for shares in peer_shares {
            let receiver = shares.receiver;
            let payload = ProtocolMessage::from(shares).serialize()?;
            if let Err(error) = self.transport.send(receiver, payload).await {
                warn!(%receiver, %error, "could not send shares");
            }
        }
        for message in self.collect(Phase::Commitments).await? {
            let received = match message {
                ProtocolMessage::MemberCommitments(message) => member.receive_commitments(message),
                ProtocolMessage::PeerShares(message) => member.receive_shares(message),
                _ => Ok(()),
            };
            if let Err(error) = received {
                warn!(%error, "rejected message");
            }
        }

        // Accusations against shares.
        let (mut member, own_accusations) = member.verify_received_shares_and_commitments();
        self.broadcast(own_accusations.clone()).await?;
        let mut accusations = vec![own_accusations];
        accusations.extend(
            self.collect(Phase::SharesAccusations)
                .await?
                .into_iter()
                .filter_map(|message| match message {
                    ProtocolMessage::SecretSharesAccusations(message) => Some(message),
                    _ => None,
                }),
        );

        let own_justification = member.justify(&accusations);
        if let Some(justification) = &own_justification {
            self.broadcast(justification.clone()).await?;
        }
        let mut justifications: Vec<_> = own_justification.into_iter().collect();
        justifications.extend(
            self.collect(Phase::SharesJustification)
                .await?
                .into_iter()
                .filter_map(|message| match message {
                    ProtocolMessage::SharesJustification(message) => Some(message),
                    _ => None,
                }),
        );
        member.resolve_secret_shares_accusations(&accusations, &justifications);

        let mut member = match member.combine_shares() {
            Ok(member) => member,
            Err(error @ Error::InsufficientQualifiedMembers { .. }) => {
                self.observe_outcome(&mut submissions).await;
                return Err(error);
            }
            Err(error) => return Err(error),
        };

        // Public key share points.
        self.broadcast(member.public_key_share_points()).await?;
        for message in self.collect(Phase::PublicKeySharePoints).await? {
            if let ProtocolMessage::PublicKeySharePoints(message) = message {
                if let Err(error) = member.receive_public_key_share_points(message) {
                    warn!(%error, "rejected message");
                }
            }
        }

        let own_accusations = member.verify_public_key_share_points();
        self.broadcast(own_accusations.clone()).await?;
        let mut accusations = vec![own_accusations];
        accusations.extend(
            self.collect(Phase::PointsAccusations)
                .await?
                .into_iter()
                .filter_map(|message| match message {
                    ProtocolMessage::PointsAccusations(message) => Some(message),
                    _ => None,
                }),
        );

        let own_justification = member.justify_points(&accusations);
        if let Some(justification) = &own_justification {
            self.broadcast(justification.clone()).await?;
        }
        let mut justifications: Vec<_> = own_justification.into_iter().collect();
        justifications.extend(
            self.collect(Phase::PointsJustification)
                .await?
                .into_iter()
                .filter_map(|message| match message {
                    ProtocolMessage::PointsJustification(message) => Some(message),
                    _ => None,
                }),
        );
        member.resolve_public_key_share_points_accusations(&accusations, &justifications);

        // Reconstruction.
        let own_revealed = member.reveal_disqualified_shares();
        if let Some(revealed) = &own_revealed {
            self.broadcast(revealed.clone()).await?;
        }
        let mut revealed: Vec<_> = own_revealed.into_iter().collect();
        revealed.extend(
            self.collect(Phase::DisqualifiedShares)
                .await?
                .into_iter()
                .filter_map(|message| match message {
                    ProtocolMessage::DisqualifiedShares(message) => Some(message),
                    _ => None,
                }),
        );
        let (result, key_share) = member.finalize(&revealed)?;

        // Publication and fate.
        let publication_start = self.publication_start_block_height();
        publish_result(
            self.member_index,
            &result,
            publication_start,
            &self.config,
            &self.chain,
        )
        .await?;
        decide_member_fate(
            self.member_index,
            &result,
            &mut submissions,
            publication_start,
            &self.config,
            &self.chain,
        )
        .await?;

        Ok(key_share)
    }

    async fn broadcast(&self, message: impl Into<ProtocolMessage<C>>) -> Result<(), Error> {
        let payload = message.into().serialize()?;
        self.transport.broadcast(payload).await
    }

    /// Wait for the result of the group without taking part in it.
    async fn observe_outcome(&self, submissions: &mut mpsc::Receiver<DkgResultSubmission>) {
        match wait_for_submission(
            submissions,
            self.publication_start_block_height(),
            &self.config,
            &self.chain,
        )
        .await
        {
            Ok(_) => info!("observed the DKG result of the group"),
            Err(error) => warn!(%error, "no DKG result observed"),
        }
    }

    /// Collect the messages of `phase` until its window closes.
    async fn collect(&mut self, phase: Phase) -> Result<Vec<ProtocolMessage<C>>, Error> {
        let deadline = self.phase_end(phase);
        let Self {
            chain,
            incoming,
            buffered,
            ..
        } = self;

        let mut messages = buffered.remove(&phase).unwrap_or_default();
        let closed = chain.wait_for_block_height(deadline);
        tokio::pin!(closed);
        loop {
            tokio::select! {
                biased;
                reached = &mut closed => {
                    reached?;
                    break;
                }
                Some(envelope) = incoming.recv() => route(envelope, phase, &mut messages, buffered),
            }
        }
        // Messages queued before the window closed.
        while let Ok(envelope) = incoming.try_recv() {
            route(envelope, phase, &mut messages, buffered);
        }

        debug!(?phase, received = messages.len(), "phase closed");
        Ok(messages)
    }
}

/// Dispatch an incoming message to the current phase, buffer it for a later
/// one or drop it.
fn route<C: Ciphersuite>(
    envelope: Envelope,
    current: Phase,
    messages: &mut Vec<ProtocolMessage<C>>,
    buffered: &mut BTreeMap<Phase, Vec<ProtocolMessage<C>>>,
) {
    let message = match ProtocolMessage::<C>::deserialize(&envelope.payload) {
        Ok(message) => message,
        Err(error) => {
            warn!(sender = %envelope.sender, %error, "dropping malformed message");
            return;
        }
    };
    if message.sender() != envelope.sender {
        warn!(
            sender = %envelope.sender,
            claimed = %message.sender(),
            "dropping message with a forged sender"
        );
        return;
    }
    let phase = Phase::of(&message);
    match phase.cmp(&current) {
        core::cmp::Ordering::Less => {
            debug!(sender = %envelope.sender, ?phase, "dropping late message")
        }
        core::cmp::Ordering::Equal => messages.push(message),
        core::cmp::Ordering::Greater => buffered.entry(phase).or_default().push(message),
    }
}
