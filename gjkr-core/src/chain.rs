//! Interfaces to the chain the group publishes its result on.
//!
//! The protocol only needs to count blocks, which drive every phase window,
//! and to publish and observe key generation results. [`local::LocalChain`]
//! implements both in memory.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use crate::{Error, MemberGroup, MemberIndex};

pub mod local;

/// A key generation result published on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DkgResultSubmission {
    /// The serialized group public key.
    pub group_public_key: Vec<u8>,
    /// The excluded members, one byte per member index.
    pub misbehaved: Vec<u8>,
}

impl DkgResultSubmission {
    /// Create a new submission.
    pub fn new(group_public_key: Vec<u8>, misbehaved: Vec<u8>) -> Self {
        Self {
            group_public_key,
            misbehaved,
        }
    }

    /// Parse the misbehaved members of `group`.
    ///
    /// Entries are treated as a set: duplicates collapse, and entries that
    /// are not members of the group are dropped.
    pub fn misbehaved_members(&self, group: &MemberGroup) -> BTreeSet<MemberIndex> {
        self.misbehaved
            .iter()
            .filter_map(|entry| {
                match MemberIndex::new(*entry).and_then(|index| group.validate(index)) {
                    Ok(index) => Some(index),
                    Err(error) => {
                        warn!(entry, %error, "ignoring invalid misbehaved entry");
                        None
                    }
                }
            })
            .collect()
    }
}

/// Counts the blocks of the chain.
#[async_trait]
pub trait BlockCounter: Send + Sync {
    /// The height of the latest block.
    async fn current_block_height(&self) -> Result<u64, Error>;

    /// Wait until the chain reaches `height`. Returns immediately if it
    /// already did.
    async fn wait_for_block_height(&self, height: u64) -> Result<(), Error>;

    /// Wait for `blocks` blocks to be mined from now.
    async fn wait_for_blocks(&self, blocks: u64) -> Result<(), Error> {
        let height = self.current_block_height().await?;
        self.wait_for_block_height(height + blocks).await
    }
}

/// Publishes and observes key generation results.
#[async_trait]
pub trait ThresholdRelay: Send + Sync {
    /// Submit the result computed by `submitter`.
    ///
    /// Fails with [`crate::ChainError::ResultAlreadySubmitted`] if a result
    /// was already accepted.
    async fn submit_dkg_result(
        &self,
        submitter: MemberIndex,
        submission: DkgResultSubmission,
    ) -> Result<(), Error>;

    /// Whether a result was already accepted.
    async fn is_dkg_result_submitted(&self) -> Result<bool, Error>;

    /// Subscribe to accepted submissions.
    ///
    /// The channel is bounded and the relay never blocks on it: a submission
    /// that does not fit is dropped for that subscriber.
    fn on_dkg_result_submitted(&self) -> mpsc::Receiver<DkgResultSubmission>;
}
