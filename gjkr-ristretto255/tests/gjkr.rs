use gjkr_ristretto255::*;
use rand::thread_rng;
use rand_chacha::ChaChaRng;
use rand_core::SeedableRng;

#[test]
fn check_random_polynomial_degree() {
    let rng = thread_rng();

    gjkr_core::tests::polynomial::check_random_polynomial_degree::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_deterministic_dealing() {
    let rng = ChaChaRng::seed_from_u64(0x6a6b72);

    gjkr_core::tests::polynomial::check_deterministic_dealing::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_interpolate_secret() {
    let rng = thread_rng();

    gjkr_core::tests::polynomial::check_interpolate_secret::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_lagrange_coefficients() {
    gjkr_core::tests::polynomial::check_lagrange_coefficients::<Ristretto255Sha512>();
}

#[test]
fn check_commitment_verifies_shares() {
    let rng = thread_rng();

    gjkr_core::tests::pedersen::check_commitment_verifies_shares::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_corrupted_share_is_rejected() {
    let rng = thread_rng();

    gjkr_core::tests::pedersen::check_corrupted_share_is_rejected::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_commit_errors() {
    let rng = thread_rng();

    gjkr_core::tests::pedersen::check_commit_errors::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_public_coefficients() {
    let rng = thread_rng();

    gjkr_core::tests::pedersen::check_public_coefficients::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_honest_round() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_honest_round::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_round_with_exactly_minimum_qualified() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_round_with_exactly_minimum_qualified::<Ristretto255Sha512, _>(
        rng,
    );
}

#[test]
fn check_insufficient_qualified_members() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_insufficient_qualified_members::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_invalid_share_disqualifies_dealer() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_invalid_share_disqualifies_dealer::<Ristretto255Sha512, _>(
        rng,
    );
}

#[test]
fn check_false_accusation_disqualifies_accuser() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_false_accusation_disqualifies_accuser::<
        Ristretto255Sha512,
        _,
    >(rng);
}

#[test]
fn check_invalid_accusations() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_invalid_accusations::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_invalid_points_are_reconstructed() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_invalid_points_are_reconstructed::<Ristretto255Sha512, _>(
        rng,
    );
}

#[test]
fn check_silent_member_is_reconstructed() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_silent_member_is_reconstructed::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_insufficient_revealed_shares() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_insufficient_revealed_shares::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_rejected_messages() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_rejected_messages::<Ristretto255Sha512, _>(rng);
}

#[test]
fn check_duplicate_messages_are_ignored() {
    let rng = thread_rng();

    gjkr_core::tests::protocol::check_duplicate_messages_are_ignored::<Ristretto255Sha512, _>(rng);
}
