//! Round configuration, member indexes and the group they belong to.

use core::fmt;

use crate::{Ciphersuite, ConfigurationError, Error, Field, Group, Scalar};

/// Default number of blocks a protocol phase stays open for.
const DEFAULT_PHASE_DURATION_BLOCKS: u64 = 3;
/// Default number of blocks between two consecutive publishers.
const DEFAULT_RESULT_PUBLICATION_BLOCK_STEP: u64 = 2;
/// Default number of blocks a member waits for a published result. Larger
/// groups get one step per member so the last member's turn still falls
/// before the deadline.
const DEFAULT_RESULT_PUBLICATION_TIMEOUT_BLOCKS: u64 = 12;

/// The index of a member in the group.
///
/// Indexes start at one, since the polynomial evaluated at zero is the
/// member's secret. The index is a single byte, matching the entries of the
/// misbehaved bitmap published on chain, so a group has at most 255 members.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MemberIndex(u8);

impl MemberIndex {
    /// Create a new member index, failing if it is zero.
    pub fn new(index: u8) -> Result<Self, Error> {
        if index == 0 {
            Err(Error::InvalidZeroIndex)
        } else {
            Ok(Self(index))
        }
    }

    /// Return the raw index.
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Map the index to the scalar field, i.e. the x-coordinate at which the
    /// polynomials are evaluated for this member.
    #[cfg_attr(feature = "internals", visibility::make(pub))]
    #[cfg_attr(docsrs, doc(cfg(feature = "internals")))]
    pub(crate) fn to_scalar<C: Ciphersuite>(&self) -> Scalar<C> {
        // Classic left-to-right double-and-add algorithm that skips the first bit 1 (since
        // indexes are never zero, there is always a bit 1), thus `sum` starts with 1 too.
        let one = <<C::Group as Group>::Field>::one();
        let mut sum = <<C::Group as Group>::Field>::one();

        let n = self.0;
        let bits = u8::BITS;
        for i in (0..(bits - n.leading_zeros() - 1)).rev() {
            sum = sum + sum;
            if n & (1 << i) != 0 {
                sum = sum + one;
            }
        }
        sum
    }
}

impl TryFrom<u8> for MemberIndex {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<MemberIndex> for u8 {
    fn from(index: MemberIndex) -> Self {
        index.0
    }
}

impl fmt::Display for MemberIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MemberIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemberIndex").field(&self.0).finish()
    }
}

/// The immutable configuration of one key generation round.
///
/// It is created by the caller at round start, shared read-only by every
/// component of the round and discarded at round end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DkgConfig {
    group: MemberGroup,
    phase_duration_blocks: u64,
    result_publication_block_step: u64,
    result_publication_timeout_blocks: u64,
}

impl DkgConfig {
    /// Create a configuration for a group of `group_size` members tolerating
    /// up to `dishonest_threshold` misbehaving ones, with default block
    /// windows.
    pub fn new(group_size: usize, dishonest_threshold: usize) -> Result<Self, Error> {
        let group = MemberGroup::new(group_size, dishonest_threshold)?;
        let result_publication_timeout_blocks = DEFAULT_RESULT_PUBLICATION_TIMEOUT_BLOCKS
            .max(group.group_size() as u64 * DEFAULT_RESULT_PUBLICATION_BLOCK_STEP);
        Ok(Self {
            group,
            phase_duration_blocks: DEFAULT_PHASE_DURATION_BLOCKS,
            result_publication_block_step: DEFAULT_RESULT_PUBLICATION_BLOCK_STEP,
            result_publication_timeout_blocks,
        })
    }

    /// Set the number of blocks each protocol phase stays open for.
    pub fn with_phase_duration_blocks(mut self, blocks: u64) -> Result<Self, Error> {
        if blocks == 0 {
            return Err(ConfigurationError::EmptyBlockWindow("phase duration").into());
        }
        self.phase_duration_blocks = blocks;
        Ok(self)
    }

    /// Set the number of blocks between two consecutive members becoming
    /// eligible to publish the result.
    ///
    /// Fails if the last member's turn would not come before the publication
    /// timeout.
    pub fn with_result_publication_block_step(mut self, blocks: u64) -> Result<Self, Error> {
        if blocks == 0 {
            return Err(ConfigurationError::EmptyBlockWindow("result publication step").into());
        }
        self.result_publication_block_step = blocks;
        self.validate_publication_turns()
    }

    /// Set the number of blocks a member waits for the result to be
    /// published before giving up.
    ///
    /// Fails if the last member's turn would not come before the timeout.
    pub fn with_result_publication_timeout_blocks(mut self, blocks: u64) -> Result<Self, Error> {
        if blocks == 0 {
            return Err(ConfigurationError::EmptyBlockWindow("result publication timeout").into());
        }
        self.result_publication_timeout_blocks = blocks;
        self.validate_publication_turns()
    }

    /// Number of blocks after the publication start at which the last
    /// member becomes eligible to publish, `(n - 1)·step`.
    pub fn last_publication_turn_blocks(&self) -> u64 {
        (self.group.group_size() as u64 - 1) * self.result_publication_block_step
    }

    fn validate_publication_turns(self) -> Result<Self, Error> {
        let last_turn = self.last_publication_turn_blocks();
        if last_turn >= self.result_publication_timeout_blocks {
            return Err(ConfigurationError::PublicationTurnsExceedTimeout {
                last_turn,
                timeout: self.result_publication_timeout_blocks,
            }
            .into());
        }
        Ok(self)
    }

    /// The group this round runs for.
    pub fn group(&self) -> &MemberGroup {
        &self.group
    }

    /// Number of blocks each protocol phase stays open for.
    pub fn phase_duration_blocks(&self) -> u64 {
        self.phase_duration_blocks
    }

    /// Number of blocks between two consecutive publishers.
    pub fn result_publication_block_step(&self) -> u64 {
        self.result_publication_block_step
    }

    /// Number of blocks to wait for a published result.
    pub fn result_publication_timeout_blocks(&self) -> u64 {
        self.result_publication_timeout_blocks
    }
}

/// The members of a key generation group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberGroup {
    group_size: u8,
    dishonest_threshold: u8,
}

impl MemberGroup {
    /// Create a group of `group_size` members with indexes `1..=group_size`,
    /// tolerating up to `dishonest_threshold` misbehaving members.
    pub fn new(group_size: usize, dishonest_threshold: usize) -> Result<Self, Error> {
        let size = u8::try_from(group_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(ConfigurationError::InvalidGroupSize(group_size))?;
        if dishonest_threshold >= group_size {
            return Err(ConfigurationError::InvalidDishonestThreshold {
                threshold: dishonest_threshold,
                group_size,
            }
            .into());
        }
        Ok(Self {
            group_size: size,
            // Lower than the group size, so it fits.
            dishonest_threshold: dishonest_threshold as u8,
        })
    }

    /// The number of members, `n`.
    pub fn group_size(&self) -> usize {
        self.group_size as usize
    }

    /// The maximum number of misbehaving members tolerated, `t`. Polynomials
    /// have degree `t`.
    pub fn dishonest_threshold(&self) -> usize {
        self.dishonest_threshold as usize
    }

    /// The minimum number of qualified members for the round to succeed,
    /// `n - t`.
    pub fn minimum_qualified(&self) -> usize {
        self.group_size() - self.dishonest_threshold()
    }

    /// The minimum number of shares needed to reconstruct a secret, `t + 1`.
    pub fn reconstruction_threshold(&self) -> usize {
        self.dishonest_threshold() + 1
    }

    /// Whether `index` belongs to the group.
    pub fn contains(&self, index: MemberIndex) -> bool {
        index.get() <= self.group_size
    }

    /// Return `index` if it belongs to the group.
    pub fn validate(&self, index: MemberIndex) -> Result<MemberIndex, Error> {
        if self.contains(index) {
            Ok(index)
        } else {
            Err(Error::UnknownMember { index })
        }
    }

    /// All member indexes, in ascending order.
    pub fn member_indexes(&self) -> impl Iterator<Item = MemberIndex> + '_ {
        (1..=self.group_size).map(MemberIndex)
    }

    /// All member indexes except `index`, in ascending order.
    pub fn peers_of(&self, index: MemberIndex) -> impl Iterator<Item = MemberIndex> + '_ {
        self.member_indexes().filter(move |peer| *peer != index)
    }
}
