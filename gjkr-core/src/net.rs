//! Interface to the messaging layer connecting the members.
//!
//! The transport authenticates senders and delivers opaque payloads, with no
//! ordering guarantee across senders. A message that does not arrive within
//! its phase window is treated as the sender not responding.

use async_trait::async_trait;

use crate::{Error, MemberIndex};

pub mod local;

/// A message received from a peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// The authenticated sender.
    pub sender: MemberIndex,
    /// The serialized message.
    pub payload: Vec<u8>,
}

/// Sends messages to the other members of the group.
///
/// Incoming messages are delivered as [`Envelope`]s on a channel handed out
/// by the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` to every other member.
    async fn broadcast(&self, payload: Vec<u8>) -> Result<(), Error>;

    /// Send `payload` to `receiver` only, on a confidential channel.
    async fn send(&self, receiver: MemberIndex, payload: Vec<u8>) -> Result<(), Error>;
}
