//! An in-memory network.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use super::{Envelope, Transport};
use crate::{Error, MemberIndex, TransportError};

type Peers = Arc<Mutex<BTreeMap<MemberIndex, mpsc::UnboundedSender<Envelope>>>>;

/// A network connecting members running in the same process.
#[derive(Clone, Debug, Default)]
pub struct LocalNetwork {
    peers: Peers,
}

impl LocalNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect the member `index`, replacing any previous connection.
    ///
    /// Returns the member's transport and the channel its incoming messages
    /// are delivered on.
    pub fn connect(&self, index: MemberIndex) -> (LocalTransport, mpsc::UnboundedReceiver<Envelope>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.peers.lock().insert(index, sender);
        (
            LocalTransport {
                index,
                peers: self.peers.clone(),
            },
            receiver,
        )
    }
}

/// The transport of one member of a [`LocalNetwork`].
#[derive(Clone, Debug)]
pub struct LocalTransport {
    index: MemberIndex,
    peers: Peers,
}

impl LocalTransport {
    fn envelope(&self, payload: Vec<u8>) -> Envelope {
        Envelope {
            sender: self.index,
            payload,
        }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn broadcast(&self, payload: Vec<u8>) -> Result<(), Error> {
        let peers = self.peers.lock();
        for (receiver, peer) in peers.iter().filter(|(receiver, _)| **receiver != self.index) {
            // A member that left simply stops receiving.
            if peer.send(self.envelope(payload.clone())).is_err() {
                trace!(sender = %self.index, %receiver, "peer disconnected");
            }
        }
        Ok(())
    }

    async fn send(&self, receiver: MemberIndex, payload: Vec<u8>) -> Result<(), Error> {
        let peers = self.peers.lock();
        let peer = peers
            .get(&receiver)
            .ok_or(TransportError::UnknownReceiver(receiver))?;
        if peer.send(self.envelope(payload)).is_err() {
            trace!(sender = %self.index, %receiver, "peer disconnected");
        }
        Ok(())
    }
}
