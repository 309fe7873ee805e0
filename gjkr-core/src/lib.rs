#![allow(non_snake_case)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! Core types and traits for the GJKR distributed key generation protocol.
//!
//! A group of `n` members, up to `t` of which may be malicious, jointly
//! generate a group public key and one private share per member, without any
//! member ever learning the group secret. Each member deals a secret using
//! Pedersen verifiable secret sharing; members that deal inconsistent shares
//! are accused, given a chance to justify themselves in public and
//! disqualified if they cannot. The public key is then extracted with a second
//! round of Feldman commitments, reconstructing the contribution of members
//! that cheat in that second round.
//!
//! After the key material is computed a member publishes its result on a chain
//! and then decides its fate: it stays in the operating group only if the
//! first published result carries the same group public key and does not flag
//! it as misbehaving.
//!
//! This crate is generic over a [`Ciphersuite`]; see the ciphersuite-specific
//! crates (e.g. `gjkr-ristretto255`) for concrete instantiations.
#![doc = document_features::document_features!()]

use core::marker::PhantomData;

pub mod chain;
pub mod config;
pub mod dkg;
mod error;
pub mod gjkr;
pub mod net;
pub mod pedersen;
pub mod polynomial;
mod serialization;
mod traits;

// Feature-gated modules
#[cfg(any(test, feature = "test-impl"))]
pub mod benches;

// Re-exports in our public API
pub use config::{DkgConfig, MemberGroup, MemberIndex};
pub use error::{ChainError, ConfigurationError, Error, FieldError, GroupError, TransportError};
pub use serde;
pub use traits::{Ciphersuite, Element, Field, Group, Scalar};

#[cfg(feature = "internals")]
pub use serialization::{SerializableElement, SerializableScalar};
#[cfg(not(feature = "internals"))]
pub(crate) use serialization::{SerializableElement, SerializableScalar};

/// Header for every serialized protocol message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C: Ciphersuite")]
#[serde(deny_unknown_fields)]
pub(crate) struct Header<C: Ciphersuite> {
    /// Format version
    #[serde(deserialize_with = "crate::serialization::version_deserialize::<_>")]
    version: u8,
    /// Ciphersuite ID
    #[serde(serialize_with = "crate::serialization::ciphersuite_serialize::<_, C>")]
    #[serde(deserialize_with = "crate::serialization::ciphersuite_deserialize::<_, C>")]
    ciphersuite: (),
    #[serde(skip)]
    phantom: PhantomData<C>,
}

impl<C> Default for Header<C>
where
    C: Ciphersuite,
{
    fn default() -> Self {
        Self {
            version: Default::default(),
            ciphersuite: Default::default(),
            phantom: Default::default(),
        }
    }
}
