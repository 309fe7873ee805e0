//! An in-memory chain.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info};

use super::{BlockCounter, DkgResultSubmission, ThresholdRelay};
use crate::{ChainError, Error, MemberIndex};

/// Capacity of each submission subscription.
const SUBMISSION_CHANNEL_CAPACITY: usize = 1;

/// A chain living in memory, for a single key generation round.
///
/// Blocks are mined on demand with [`LocalChain::mine_blocks`] or
/// periodically with [`LocalChain::mine_every`]. The relay accepts the first
/// submitted result and rejects every later one. Clones share the same chain.
#[derive(Clone, Debug)]
pub struct LocalChain {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    block_height: watch::Sender<u64>,
    relay: Mutex<RelayState>,
    miner: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Debug, Default)]
struct RelayState {
    submitted: Option<(MemberIndex, DkgResultSubmission)>,
    subscribers: Vec<mpsc::Sender<DkgResultSubmission>>,
}

impl LocalChain {
    /// Create a chain at height zero.
    pub fn new() -> Self {
        let (block_height, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                block_height,
                relay: Mutex::new(RelayState::default()),
                miner: Mutex::new(None),
            }),
        }
    }

    /// Mine `blocks` blocks.
    pub fn mine_blocks(&self, blocks: u64) {
        self.inner.mine_blocks(blocks);
    }

    /// Mine a block every `period` in a background task, replacing any
    /// previous one. The task stops once every clone of the chain is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mine_every(&self, period: Duration) {
        let chain = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(mine(chain, period));
        if let Some(previous) = self.inner.miner.lock().replace(handle) {
            previous.abort();
        }
    }

    /// The accepted submission and its submitter, if any.
    pub fn submitted_result(&self) -> Option<(MemberIndex, DkgResultSubmission)> {
        self.inner.relay.lock().submitted.clone()
    }
}

impl Default for LocalChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn mine_blocks(&self, blocks: u64) {
        self.block_height.send_modify(|height| *height += blocks);
        debug!(height = *self.block_height.borrow(), "mined blocks");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(miner) = self.miner.lock().take() {
            miner.abort();
        }
    }
}

async fn mine(chain: Weak<Inner>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        match chain.upgrade() {
            Some(chain) => chain.mine_blocks(1),
            None => break,
        }
    }
}

#[async_trait]
impl BlockCounter for LocalChain {
    async fn current_block_height(&self) -> Result<u64, Error> {
        Ok(*self.inner.block_height.borrow())
    }

    async fn wait_for_block_height(&self, height: u64) -> Result<(), Error> {
        let mut block_height = self.inner.block_height.subscribe();
        block_height
            .wait_for(|current| *current >= height)
            .await
            .map_err(|_| ChainError::Closed)?;
        Ok(())
    }
}

#[async_trait]
impl ThresholdRelay for LocalChain {
    async fn submit_dkg_result(
        &self,
        submitter: MemberIndex,
        submission: DkgResultSubmission,
    ) -> Result<(), Error> {
        let mut relay = self.inner.relay.lock();
        if relay.submitted.is_some() {
            return Err(ChainError::ResultAlreadySubmitted.into());
        }
        info!(%submitter, "DKG result submitted");
        relay.subscribers.retain(|subscriber| !subscriber.is_closed());
        for subscriber in &relay.subscribers {
            if subscriber.try_send(submission.clone()).is_err() {
                debug!("dropping submission for a full subscription");
            }
        }
        relay.submitted = Some((submitter, submission));
        Ok(())
    }

    async fn is_dkg_result_submitted(&self) -> Result<bool, Error> {
        Ok(self.inner.relay.lock().submitted.is_some())
    }

    fn on_dkg_result_submitted(&self) -> mpsc::Receiver<DkgResultSubmission> {
        let (sender, receiver) = mpsc::channel(SUBMISSION_CHANNEL_CAPACITY);
        self.inner.relay.lock().subscribers.push(sender);
        receiver
    }
}
