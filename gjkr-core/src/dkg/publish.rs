//! Publishing a computed result on chain.

use tracing::{debug, info, warn};

use crate::{
    chain::{BlockCounter, ThresholdRelay},
    gjkr::DkgResult,
    ChainError, Ciphersuite, DkgConfig, Error, MemberIndex,
};

/// The block at which `member_index` may publish its result.
///
/// Members take turns in index order, one every
/// `result_publication_block_step` blocks, so that the first honest member
/// publishes while the others only watch.
pub fn eligible_block_height(
    member_index: MemberIndex,
    publication_start_block_height: u64,
    config: &DkgConfig,
) -> u64 {
    publication_start_block_height
        + u64::from(member_index.get() - 1) * config.result_publication_block_step()
}

/// Wait for the member's turn and publish `result`, unless some result was
/// already published or the turn comes no earlier than the publication
/// deadline, since members deciding their fate would no longer see it.
pub async fn publish_result<C, H>(
    member_index: MemberIndex,
    result: &DkgResult<C>,
    publication_start_block_height: u64,
    config: &DkgConfig,
    chain: &H,
) -> Result<(), Error>
where
    C: Ciphersuite,
    H: BlockCounter + ThresholdRelay + ?Sized,
{
    let eligible_at = eligible_block_height(member_index, publication_start_block_height, config);
    let deadline = publication_start_block_height + config.result_publication_timeout_blocks();
    if eligible_at >= deadline {
        warn!(
            member = %member_index,
            eligible_at,
            deadline,
            "publication turn comes after the deadline"
        );
        return Ok(());
    }
    chain.wait_for_block_height(eligible_at).await?;

    if chain.is_dkg_result_submitted().await? {
        debug!(member = %member_index, "DKG result already published");
        return Ok(());
    }

    match chain
        .submit_dkg_result(member_index, result.to_submission()?)
        .await
    {
        Ok(()) => {
            info!(member = %member_index, height = eligible_at, "published DKG result");
            Ok(())
        }
        Err(Error::Chain(ChainError::ResultAlreadySubmitted)) => {
            debug!(member = %member_index, "DKG result published concurrently");
            Ok(())
        }
        Err(error) => Err(error),
    }
}
