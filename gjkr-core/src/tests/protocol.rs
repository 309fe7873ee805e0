//! Ciphersuite-generic test functions for the member protocol.

use std::{collections::BTreeSet, sync::Arc};

use rand_core::{CryptoRng, RngCore};

use crate::{
    gjkr::{
        LocalMember, MemberCommitmentsMessage, PeerSharesMessage, PublicKeySharePointsMessage,
        SecretSharesAccusationsMessage, SharePair,
    },
    pedersen::{CoefficientCommitment, PedersenCommitment, PublicCoefficients},
    polynomial::Share,
    tests::helpers::*,
    Ciphersuite, DkgConfig, Error, Field, Group,
};

fn random_share<C: Ciphersuite, R: RngCore + CryptoRng>(rng: &mut R) -> Share<C> {
    Share::new(<<C::Group as Group>::Field>::random(rng))
}

/// Test a round in which every member behaves.
pub fn check_honest_round<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    for (n, t) in [(1, 0), (3, 1), (5, 2), (7, 3)] {
        let config = DkgConfig::new(n, t).unwrap();
        let everyone: Vec<_> = config.group().member_indexes().collect();
        let outputs = run_protocol::<C, R>(config, &everyone, &mut rng);

        assert_eq!(outputs.len(), n);
        check_consistent_outputs(&outputs, &everyone);
        for (result, _) in outputs.values() {
            assert!(result.misbehaved().is_empty());
            assert!(result.misbehaved_bytes().is_empty());
        }
    }
}

/// Test that members missing from the start of the round are marked as
/// inactive, and that the round still succeeds with exactly `n - t` members.
pub fn check_round_with_exactly_minimum_qualified<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let config = DkgConfig::new(5, 2).unwrap();
    let active = indexes([1, 2, 3]);
    let outputs = run_protocol::<C, R>(config, &active, &mut rng);

    check_consistent_outputs(&outputs, &active);
    for (result, _) in outputs.values() {
        assert_eq!(result.misbehaved(), &index_set([4, 5]));
        assert_eq!(result.misbehaved_bytes(), vec![4, 5]);
    }
}

/// Test that qualification fails when fewer than `n - t` members take part.
pub fn check_insufficient_qualified_members<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let config = Arc::new(DkgConfig::new(5, 2).unwrap());
    let committing = deliver(deal::<C, R>(&config, &indexes([1, 2]), &mut rng));

    let results = qualify(committing);
    assert_eq!(results.len(), 2);
    for (_, result) in results {
        let error = result.unwrap_err();
        assert_eq!(
            error,
            Error::InsufficientQualifiedMembers {
                qualified: 2,
                required: 3
            }
        );
        assert!(!error.is_fate_decision());
    }
}

/// Test that a dealer handing out an invalid share, and revealing the same
/// invalid share when accused, is disqualified by everyone.
pub fn check_invalid_share_disqualifies_dealer<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let config = Arc::new(DkgConfig::new(5, 2).unwrap());
    let cheater = member(2);
    let victim = member(4);
    let honest = indexes([1, 3, 4, 5]);

    let mut dealt = deal::<C, R>(&config, &indexes(1..=5), &mut rng);
    let bad_shares = SharePair::new(random_share(&mut rng), random_share(&mut rng));
    dealt
        .shares
        .iter_mut()
        .filter(|m| m.sender == cheater && m.receiver == victim)
        .for_each(|m| m.shares = bad_shares);

    let (justifying, accusations) = verify_all(deliver(dealt));
    for message in &accusations {
        if message.sender == victim {
            assert_eq!(message.accused, index_set([2]));
        } else {
            assert!(message.accused.is_empty());
        }
    }

    let mut justifications = justify_all(&justifying, &accusations);
    assert_eq!(justifications.len(), 1);
    assert_eq!(justifications[0].sender, cheater);
    justifications[0].justifications.insert(victim, bad_shares);

    let sharing = unwrap_all(combine_all(justifying, &accusations, &justifications));
    for index in &honest {
        let member = &sharing[index];
        assert_eq!(member.exclusions().disqualified(), &index_set([2]));
        assert!(!member.qualified().contains(&cheater));
        assert_eq!(member.qualified().len(), 4);
    }

    let points = share_points(&sharing);
    let outputs = unwrap_all(extract(sharing, points));
    check_consistent_outputs(&outputs, &honest);
    assert_eq!(outputs[&member(1)].0.misbehaved_bytes(), vec![2]);
}

/// Test that a member accusing an honest dealer is disqualified once the
/// dealer reveals valid shares.
pub fn check_false_accusation_disqualifies_accuser<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let config = Arc::new(DkgConfig::new(5, 2).unwrap());
    let liar = member(3);
    let honest = indexes([1, 2, 4, 5]);

    let (justifying, mut accusations) =
        verify_all(deliver(deal::<C, R>(&config, &indexes(1..=5), &mut rng)));
    accusations
        .iter_mut()
        .filter(|m| m.sender == liar)
        .for_each(|m| {
            m.accused.insert(member(1));
        });

    let justifications = justify_all(&justifying, &accusations);
    assert_eq!(justifications.len(), 1);
    assert_eq!(justifications[0].sender, member(1));
    assert_eq!(
        justifications[0].justifications.keys().collect::<Vec<_>>(),
        vec![&liar]
    );

    let sharing = unwrap_all(combine_all(justifying, &accusations, &justifications));
    for index in &honest {
        assert_eq!(sharing[index].exclusions().disqualified(), &index_set([3]));
    }

    let points = share_points(&sharing);
    let outputs = unwrap_all(extract(sharing, points));
    check_consistent_outputs(&outputs, &honest);
    for index in &honest {
        assert_eq!(outputs[index].0.misbehaved_bytes(), vec![3]);
    }
}

/// Test that accusing oneself or an excluded member disqualifies the
/// accuser, and that accusations by excluded or unknown members are ignored.
pub fn check_invalid_accusations<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let config = Arc::new(DkgConfig::new(6, 3).unwrap());

    // Member 6 never deals and is inactive for everyone.
    let (justifying, mut accusations) =
        verify_all(deliver(deal::<C, R>(&config, &indexes(1..=5), &mut rng)));
    for message in accusations.iter_mut() {
        match message.sender.get() {
            1 => message.accused.insert(member(1)),
            2 => message.accused.insert(member(6)),
            _ => false,
        };
    }
    accusations.push(SecretSharesAccusationsMessage::new(
        member(9),
        index_set([4]),
    ));
    accusations.push(SecretSharesAccusationsMessage::new(
        member(6),
        index_set([4]),
    ));

    let justifications = justify_all(&justifying, &accusations);
    let sharing = unwrap_all(combine_all(justifying, &accusations, &justifications));
    for index in indexes([3, 4, 5]) {
        let member = &sharing[&index];
        assert_eq!(member.exclusions().disqualified(), &index_set([1, 2]));
        assert_eq!(member.exclusions().inactive(), &index_set([6]));
        assert_eq!(member.qualified(), &index_set([3, 4, 5]));
    }
}

/// Test that a qualified member revealing public key share points that do
/// not match its shares is disqualified, and that its secret is
/// reconstructed into the group public key.
pub fn check_invalid_points_are_reconstructed<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let config = Arc::new(DkgConfig::new(5, 2).unwrap());
    let cheater = member(5);
    let honest = indexes(1..=4);

    let sharing = unwrap_all(qualify(deliver(deal::<C, R>(
        &config,
        &indexes(1..=5),
        &mut rng,
    ))));
    let mut points = share_points(&sharing);
    let tampered = generate_element::<C, R>(&mut rng);
    for message in points.iter_mut().filter(|m| m.sender == cheater) {
        let mut coefficients = message.points.coefficients().to_vec();
        coefficients[0] = CoefficientCommitment::new(tampered);
        message.points = PublicCoefficients(coefficients);
    }

    let mut outputs = extract(sharing, points);
    // The cheater checks accusations against its real points, so it ends up
    // excluding everyone else and cannot finish.
    assert!(outputs.remove(&cheater).unwrap().is_err());
    let outputs = unwrap_all(outputs);
    check_consistent_outputs(&outputs, &honest);
    for index in &honest {
        assert_eq!(outputs[index].0.misbehaved_bytes(), vec![5]);
    }
}

/// Test that a qualified member that goes silent before revealing its public
/// key share points is marked as inactive and reconstructed.
pub fn check_silent_member_is_reconstructed<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let config = Arc::new(DkgConfig::new(5, 2).unwrap());
    let honest = indexes(1..=4);

    let mut sharing = unwrap_all(qualify(deliver(deal::<C, R>(
        &config,
        &indexes(1..=5),
        &mut rng,
    ))));
    sharing.remove(&member(5));
    let points = share_points(&sharing);

    let outputs = unwrap_all(extract(sharing, points));
    check_consistent_outputs(&outputs, &honest);
    for index in &honest {
        let (result, _) = &outputs[index];
        assert_eq!(result.misbehaved(), &index_set([5]));
    }
}

/// Test that reconstruction fails without `t + 1` revealed shares.
pub fn check_insufficient_revealed_shares<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    // All three members qualify, then two go silent: member 1 holds a single
    // share of each of their secrets.
    let config = Arc::new(DkgConfig::new(3, 1).unwrap());
    let mut sharing = unwrap_all(qualify(deliver(deal::<C, R>(
        &config,
        &indexes(1..=3),
        &mut rng,
    ))));
    sharing.retain(|index, _| *index == member(1));
    let points = share_points(&sharing);

    let outputs = extract(sharing, points);
    assert_eq!(
        outputs[&member(1)].as_ref().unwrap_err(),
        &Error::InsufficientRevealedShares {
            disqualified: member(2)
        }
    );
}

/// Test the validation of incoming sharing messages.
pub fn check_rejected_messages<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let config = Arc::new(DkgConfig::new(4, 1).unwrap());

    assert_eq!(
        LocalMember::new(member(5), config.clone()).unwrap_err(),
        Error::UnknownMember { index: member(5) }
    );

    let mut dealt = deal::<C, R>(&config, &indexes(1..=4), &mut rng);
    let own = dealt.commitments[0].clone();
    let from_two = dealt.commitments[1].clone();
    let shares_for_three = dealt
        .shares
        .iter()
        .find(|m| m.sender == member(2) && m.receiver == member(3))
        .unwrap()
        .clone();
    let mut committing = dealt.members.remove(&member(1)).unwrap();

    assert_eq!(
        committing.receive_commitments(own),
        Err(Error::InvalidPeer { index: member(1) })
    );
    assert_eq!(
        committing.receive_commitments(MemberCommitmentsMessage::new(
            member(7),
            from_two.commitments.clone()
        )),
        Err(Error::UnknownMember { index: member(7) })
    );
    assert_eq!(
        committing.receive_shares(shares_for_three),
        Err(Error::UnexpectedReceiver {
            receiver: member(3)
        })
    );

    // Too few commitments disqualify the sender.
    let short = PedersenCommitment(from_two.commitments.coefficients()[..1].to_vec());
    assert_eq!(
        committing.receive_commitments(MemberCommitmentsMessage::new(member(3), short)),
        Err(Error::IncorrectNumberOfCommitments)
    );
    assert_eq!(committing.exclusions().disqualified(), &index_set([3]));
}

/// Test that only the first message of each sender counts.
pub fn check_duplicate_messages_are_ignored<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let config = Arc::new(DkgConfig::new(3, 1).unwrap());
    let dealt = deal::<C, R>(&config, &indexes(1..=3), &mut rng);
    let commitments_of_two = dealt.commitments[1].clone();
    let mut committing = deliver(dealt);
    let receiver = committing.get_mut(&member(1)).unwrap();

    // Replayed with other content after the original was recorded.
    let forged_shares = SharePair::new(random_share(&mut rng), random_share(&mut rng));
    receiver
        .receive_shares(PeerSharesMessage::new(member(2), member(1), forged_shares))
        .unwrap();
    let forged_commitments = {
        let mut coefficients = commitments_of_two.commitments.coefficients().to_vec();
        coefficients.reverse();
        PedersenCommitment(coefficients)
    };
    receiver
        .receive_commitments(MemberCommitmentsMessage::new(member(2), forged_commitments))
        .unwrap();
    assert!(receiver.exclusions().disqualified().is_empty());

    let (_, accusations) = verify_all(committing);
    for message in accusations {
        assert!(message.accused.is_empty());
    }

    // A later points message of the wrong length does not disqualify the
    // original sender either.
    let mut sharing = unwrap_all(qualify(deliver(deal::<C, R>(
        &config,
        &indexes(1..=3),
        &mut rng,
    ))));
    let points = share_points(&sharing);
    let receiver = sharing.get_mut(&member(1)).unwrap();
    receiver
        .receive_public_key_share_points(points[1].clone())
        .unwrap();
    receiver
        .receive_public_key_share_points(PublicKeySharePointsMessage::new(
            member(2),
            PublicCoefficients(Vec::new()),
        ))
        .unwrap();
    assert!(receiver.exclusions().disqualified().is_empty());
    assert_eq!(
        receiver.verify_public_key_share_points().accused,
        BTreeSet::new()
    );
}
