//! Helper functions for testing

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use rand_core::{CryptoRng, RngCore};

use crate::{
    gjkr::{
        CommittingMember, DkgResult, JustifyingMember, KeyShare, LocalMember,
        MemberCommitmentsMessage, PeerSharesMessage, PublicKeySharePointsMessage,
        SecretSharesAccusationsMessage, SharesJustificationMessage, SharingMember,
    },
    polynomial::interpolate_secret,
    Ciphersuite, DkgConfig, Element, Error, Field, Group, MemberIndex,
};

/// Helper function for randomly generating an element
pub fn generate_element<C: Ciphersuite, R: RngCore + CryptoRng>(rng: &mut R) -> Element<C> {
    let scalar = <<C::Group as Group>::Field>::random(rng);
    <C::Group>::generator() * scalar
}

/// Shorthand for a valid member index.
pub fn member(index: u8) -> MemberIndex {
    MemberIndex::new(index).unwrap()
}

/// Shorthand for a list of valid member indexes.
pub fn indexes(indexes: impl IntoIterator<Item = u8>) -> Vec<MemberIndex> {
    indexes.into_iter().map(member).collect()
}

/// Shorthand for a set of valid member indexes.
pub fn index_set(indexes: impl IntoIterator<Item = u8>) -> BTreeSet<MemberIndex> {
    indexes.into_iter().map(member).collect()
}

/// The output of the dealing step for a set of members, before delivery.
pub struct Dealt<C: Ciphersuite> {
    /// The members, keyed by index.
    pub members: BTreeMap<MemberIndex, CommittingMember<C>>,
    /// Every shares message, to be delivered to its receiver.
    pub shares: Vec<PeerSharesMessage<C>>,
    /// Every commitments message, to be delivered to all other members.
    pub commitments: Vec<MemberCommitmentsMessage<C>>,
}

/// Let each `active` member deal its shares and commitments. Members of the
/// group that are not in `active` stay silent for the whole round.
pub fn deal<C: Ciphersuite, R: RngCore + CryptoRng>(
    config: &Arc<DkgConfig>,
    active: &[MemberIndex],
    rng: &mut R,
) -> Dealt<C> {
    let mut dealt = Dealt {
        members: BTreeMap::new(),
        shares: Vec::new(),
        commitments: Vec::new(),
    };
    for index in active {
        let (member, shares, commitments) = LocalMember::new(*index, config.clone())
            .unwrap()
            .calculate_shares_and_commitments::<C, R>(rng)
            .unwrap();
        dealt.members.insert(*index, member);
        dealt.shares.extend(shares);
        dealt.commitments.push(commitments);
    }
    dealt
}

/// Deliver every dealt message to the members it is meant for.
pub fn deliver<C: Ciphersuite>(dealt: Dealt<C>) -> BTreeMap<MemberIndex, CommittingMember<C>> {
    let Dealt {
        mut members,
        shares,
        commitments,
    } = dealt;
    for (index, member) in members.iter_mut() {
        for message in commitments.iter().filter(|m| m.sender() != index) {
            member.receive_commitments(message.clone()).unwrap();
        }
        for message in shares.iter().filter(|m| m.receiver() == index) {
            member.receive_shares(message.clone()).unwrap();
        }
    }
    members
}

/// Let every member verify its shares and raise its accusations.
pub fn verify_all<C: Ciphersuite>(
    members: BTreeMap<MemberIndex, CommittingMember<C>>,
) -> (
    BTreeMap<MemberIndex, JustifyingMember<C>>,
    Vec<SecretSharesAccusationsMessage<C>>,
) {
    let mut justifying = BTreeMap::new();
    let mut accusations = Vec::new();
    for (index, member) in members {
        let (member, message) = member.verify_received_shares_and_commitments();
        justifying.insert(index, member);
        accusations.push(message);
    }
    (justifying, accusations)
}

/// Let every accused member answer the accusations.
pub fn justify_all<C: Ciphersuite>(
    members: &BTreeMap<MemberIndex, JustifyingMember<C>>,
    accusations: &[SecretSharesAccusationsMessage<C>],
) -> Vec<SharesJustificationMessage<C>> {
    members
        .values()
        .filter_map(|member| member.justify(accusations))
        .collect()
}

/// Let every member resolve the accusations and combine its shares.
pub fn combine_all<C: Ciphersuite>(
    members: BTreeMap<MemberIndex, JustifyingMember<C>>,
    accusations: &[SecretSharesAccusationsMessage<C>],
    justifications: &[SharesJustificationMessage<C>],
) -> BTreeMap<MemberIndex, Result<SharingMember<C>, Error>> {
    members
        .into_iter()
        .map(|(index, mut member)| {
            member.resolve_secret_shares_accusations(accusations, justifications);
            (index, member.combine_shares())
        })
        .collect()
}

/// Run the sharing phases for honest members.
pub fn qualify<C: Ciphersuite>(
    members: BTreeMap<MemberIndex, CommittingMember<C>>,
) -> BTreeMap<MemberIndex, Result<SharingMember<C>, Error>> {
    let (members, accusations) = verify_all(members);
    let justifications = justify_all(&members, &accusations);
    combine_all(members, &accusations, &justifications)
}

/// The public key share points of every member, to be broadcast.
pub fn share_points<C: Ciphersuite>(
    members: &BTreeMap<MemberIndex, SharingMember<C>>,
) -> Vec<PublicKeySharePointsMessage<C>> {
    members
        .values()
        .map(|member| member.public_key_share_points())
        .collect()
}

/// Run the extraction phases: deliver `points` to every member, settle the
/// accusations against them and reconstruct the secrets of the members
/// disqualified along the way.
pub fn extract<C: Ciphersuite>(
    mut members: BTreeMap<MemberIndex, SharingMember<C>>,
    points: Vec<PublicKeySharePointsMessage<C>>,
) -> BTreeMap<MemberIndex, Result<(DkgResult<C>, KeyShare<C>), Error>> {
    for (index, member) in members.iter_mut() {
        for message in points.iter().filter(|m| m.sender() != index) {
            // Points with a bad length disqualify their sender.
            let _ = member.receive_public_key_share_points(message.clone());
        }
    }

    let accusations: Vec<_> = members
        .values_mut()
        .map(|member| member.verify_public_key_share_points())
        .collect();
    let justifications: Vec<_> = members
        .values()
        .filter_map(|member| member.justify_points(&accusations))
        .collect();
    for member in members.values_mut() {
        member.resolve_public_key_share_points_accusations(&accusations, &justifications);
    }
    let revealed: Vec<_> = members
        .values()
        .filter_map(|member| member.reveal_disqualified_shares())
        .collect();

    members
        .into_iter()
        .map(|(index, member)| (index, member.finalize(&revealed)))
        .collect()
}

/// Run a whole round in memory in which the `active` members behave honestly.
pub fn run_protocol<C: Ciphersuite, R: RngCore + CryptoRng>(
    config: DkgConfig,
    active: &[MemberIndex],
    rng: &mut R,
) -> BTreeMap<MemberIndex, (DkgResult<C>, KeyShare<C>)> {
    let config = Arc::new(config);
    let members = deliver(deal::<C, R>(&config, active, rng));
    let members = unwrap_all(qualify(members));
    let points = share_points(&members);
    unwrap_all(extract(members, points))
}

/// Unwrap every result of a phase.
pub fn unwrap_all<T>(
    results: BTreeMap<MemberIndex, Result<T, Error>>,
) -> BTreeMap<MemberIndex, T> {
    results
        .into_iter()
        .map(|(index, result)| (index, result.unwrap()))
        .collect()
}

/// Check that the given members agree on the result and that the group
/// public key matches the secret their shares interpolate to.
pub fn check_consistent_outputs<C: Ciphersuite>(
    outputs: &BTreeMap<MemberIndex, (DkgResult<C>, KeyShare<C>)>,
    honest: &[MemberIndex],
) {
    let (expected, _) = &outputs[&honest[0]];
    for index in honest {
        let (result, key_share) = &outputs[index];
        assert_eq!(result, expected);
        assert_eq!(result.misbehaved(), expected.misbehaved());
        assert_eq!(key_share.index(), index);
        assert_eq!(key_share.group_public_key(), expected.group_public_key());
        assert!(
            key_share.public_share().to_element()
                == <C::Group>::generator() * key_share.private_share().to_scalar()
        );
    }

    let points: BTreeMap<_, _> = honest
        .iter()
        .map(|index| (*index, outputs[index].1.private_share().to_scalar()))
        .collect();
    let secret = interpolate_secret::<C>(&points).unwrap();
    assert!(<C::Group>::generator() * secret == expected.group_public_key().to_element());
}
