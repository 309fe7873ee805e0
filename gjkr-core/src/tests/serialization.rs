//! Serialization test functions

use std::sync::Arc;

use rand_core::{CryptoRng, RngCore};
use serde_json::Value;

use crate::{
    gjkr::{
        KeyShare, MemberCommitmentsMessage, ProtocolMessage, SecretSharesAccusationsMessage,
        SharesJustificationMessage,
    },
    tests::helpers::*,
    Ciphersuite, DkgConfig, Error,
};

/// Test that protocol messages survive the wire format.
pub fn check_protocol_message_serialization<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let config = Arc::new(DkgConfig::new(3, 1).unwrap());
    let dealt = deal::<C, R>(&config, &indexes(1..=3), &mut rng);

    let mut messages: Vec<ProtocolMessage<C>> = Vec::new();
    messages.extend(dealt.commitments.iter().cloned().map(Into::into));
    messages.extend(dealt.shares.iter().cloned().map(Into::into));
    messages.push(SecretSharesAccusationsMessage::new(member(2), index_set([1, 3])).into());
    messages.push(
        SharesJustificationMessage::new(
            member(1),
            [(member(2), dealt.shares[0].shares)].into_iter().collect(),
        )
        .into(),
    );

    let committing = deliver(dealt);
    let sharing = unwrap_all(qualify(committing));
    messages.extend(share_points(&sharing).into_iter().map(Into::into));

    for message in messages {
        let bytes = message.serialize().unwrap();
        let decoded = ProtocolMessage::<C>::deserialize(&bytes).unwrap();
        assert_eq!(decoded.sender(), message.sender());
        assert_eq!(decoded, message);
    }
}

/// Test that a member's key share survives serialization.
pub fn check_key_share_serialization<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let config = DkgConfig::new(3, 1).unwrap();
    let outputs = run_protocol::<C, R>(config, &indexes(1..=3), &mut rng);

    for (_, key_share) in outputs.values() {
        let bytes = key_share.serialize().unwrap();
        assert_eq!(&KeyShare::<C>::deserialize(&bytes).unwrap(), key_share);
    }
}

/// Test that the header pins the format version and the ciphersuite.
pub fn check_header_validation<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let config = Arc::new(DkgConfig::new(3, 1).unwrap());
    let message = deal::<C, R>(&config, &indexes(1..=3), &mut rng)
        .commitments
        .remove(0);

    // Binary: version byte, then the 4-byte short ciphersuite ID.
    let bytes = message.serialize().unwrap();
    let mut wrong_version = bytes.clone();
    wrong_version[0] = 1;
    assert_eq!(
        MemberCommitmentsMessage::<C>::deserialize(&wrong_version),
        Err(Error::DeserializationError)
    );
    let mut wrong_ciphersuite = bytes.clone();
    wrong_ciphersuite[1] ^= 0xff;
    assert_eq!(
        MemberCommitmentsMessage::<C>::deserialize(&wrong_ciphersuite),
        Err(Error::DeserializationError)
    );
    assert_eq!(
        MemberCommitmentsMessage::<C>::deserialize(&bytes).unwrap(),
        message
    );

    // Human-readable: the full ciphersuite ID.
    let json = serde_json::to_string(&message).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["header"]["version"], 0);
    assert_eq!(value["header"]["ciphersuite"], C::ID);
    assert_eq!(value["sender"], 1);
    assert_eq!(
        serde_json::from_str::<MemberCommitmentsMessage<C>>(&json).unwrap(),
        message
    );

    let mut invalid = value.clone();
    invalid["header"]["ciphersuite"] = "GJKR-INVALID".into();
    assert!(serde_json::from_str::<MemberCommitmentsMessage<C>>(&invalid.to_string()).is_err());

    let mut invalid = value.clone();
    invalid["header"]["version"] = 1.into();
    assert!(serde_json::from_str::<MemberCommitmentsMessage<C>>(&invalid.to_string()).is_err());

    let mut invalid = value;
    invalid["sender"] = 0.into();
    assert!(serde_json::from_str::<MemberCommitmentsMessage<C>>(&invalid.to_string()).is_err());
}
