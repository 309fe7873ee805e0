//! Deciding whether a member stays in the group once the round is over.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    chain::{BlockCounter, DkgResultSubmission},
    gjkr::DkgResult,
    Ciphersuite, DkgConfig, Error, MemberIndex,
};

/// Wait for the first result submission, giving up once the chain reaches
/// `start_block_height` plus the configured publication timeout.
///
/// Whichever of the two happens first wins; if both are ready, the
/// submission does. The losing wait is dropped. Exactly one submission is
/// consumed from `submissions`; a closed channel counts as no submission.
pub async fn wait_for_submission<B>(
    submissions: &mut mpsc::Receiver<DkgResultSubmission>,
    start_block_height: u64,
    config: &DkgConfig,
    block_counter: &B,
) -> Result<DkgResultSubmission, Error>
where
    B: BlockCounter + ?Sized,
{
    let deadline = start_block_height + config.result_publication_timeout_blocks();
    tokio::select! {
        biased;
        Some(submission) = submissions.recv() => Ok(submission),
        reached = block_counter.wait_for_block_height(deadline) => {
            reached?;
            Err(Error::PublicationTimeout)
        }
    }
}

/// Decide the fate of `member_index` from the first result published after
/// `start_block_height`.
///
/// The member stays in the group, and `Ok(())` is returned, only if the
/// published group public key is byte for byte the one in `result` and the
/// published misbehaved set does not contain the member. Otherwise this
/// returns [`Error::PublicationTimeout`], [`Error::GroupPublicKeyMismatch`]
/// or [`Error::SelfMisbehaving`]. The only other error is
/// [`Error::Group`], if the local group public key cannot be serialized.
pub async fn decide_member_fate<C, B>(
    member_index: MemberIndex,
    result: &DkgResult<C>,
    submissions: &mut mpsc::Receiver<DkgResultSubmission>,
    start_block_height: u64,
    config: &DkgConfig,
    block_counter: &B,
) -> Result<(), Error>
where
    C: Ciphersuite,
    B: BlockCounter + ?Sized,
{
    let submission =
        match wait_for_submission(submissions, start_block_height, config, block_counter).await {
            Ok(submission) => submission,
            Err(error) => {
                warn!(member = %member_index, %error, "no DKG result observed");
                return Err(error);
            }
        };

    if submission.group_public_key != result.group_public_key_bytes()? {
        let error = Error::GroupPublicKeyMismatch {
            member: member_index,
        };
        warn!(member = %member_index, %error, "leaving the group");
        return Err(error);
    }

    if submission
        .misbehaved_members(config.group())
        .contains(&member_index)
    {
        let error = Error::SelfMisbehaving {
            member: member_index,
        };
        warn!(member = %member_index, %error, "leaving the group");
        return Err(error);
    }

    info!(member = %member_index, "member stays in the group");
    Ok(())
}
