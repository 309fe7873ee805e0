//! GJKR Error types

use thiserror::Error;

use crate::MemberIndex;

/// An error related to the GJKR distributed key generation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// The round configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// Error in scalar Field.
    #[error("Error in scalar Field.")]
    Field(#[from] FieldError),
    /// Error in elliptic curve Group.
    #[error("Error in elliptic curve Group.")]
    Group(#[from] GroupError),
    /// Error reported by the chain collaborator.
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
    /// Error reported by the messaging collaborator.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    /// Member indexes start at one.
    #[error("Member index must not be zero.")]
    InvalidZeroIndex,
    /// The member index is not part of the group.
    #[error("Member {index} is not part of the group.")]
    UnknownMember {
        /// The offending index.
        index: MemberIndex,
    },
    /// The message comes from the local member itself.
    #[error("Member {index} is not a peer of the local member.")]
    InvalidPeer {
        /// The offending index.
        index: MemberIndex,
    },
    /// The message is addressed to another member.
    #[error("Message addressed to member {receiver}.")]
    UnexpectedReceiver {
        /// The member the message is addressed to.
        receiver: MemberIndex,
    },
    /// The number of commitments does not match the polynomial degree.
    #[error("Incorrect number of commitments.")]
    IncorrectNumberOfCommitments,
    /// A share received from a peer does not match its commitments.
    #[error("Invalid secret share received from member {culprit}.")]
    InvalidShare {
        /// The member who dealt the share.
        culprit: MemberIndex,
    },
    /// Too few members survived qualification to compute a usable share.
    #[error("Only {qualified} members qualified, at least {required} are required.")]
    InsufficientQualifiedMembers {
        /// The number of qualified members, including the local one.
        qualified: usize,
        /// The minimum number of qualified members, `n - t`.
        required: usize,
    },
    /// Not enough valid shares were revealed to reconstruct the contribution
    /// of a disqualified member.
    #[error("Not enough shares revealed to reconstruct the secret of member {disqualified}.")]
    InsufficientRevealedShares {
        /// The member whose secret could not be reconstructed.
        disqualified: MemberIndex,
    },
    /// No result was published before the deadline.
    #[error("DKG result publication timed out")]
    PublicationTimeout,
    /// The published group public key differs from the local one.
    #[error(
        "[member:{member}] could not stay in the group because \
         member do not support the same group public key"
    )]
    GroupPublicKeyMismatch {
        /// The local member.
        member: MemberIndex,
    },
    /// The published result flags the local member as misbehaving.
    #[error(
        "[member:{member}] could not stay in the group because \
         member is considered as misbehaving"
    )]
    SelfMisbehaving {
        /// The local member.
        member: MemberIndex,
    },
    /// Error serializing value.
    #[error("Error serializing value.")]
    SerializationError,
    /// Error deserializing value.
    #[error("Error deserializing value.")]
    DeserializationError,
}

impl Error {
    /// Return the member who is to blame for the error, if any.
    ///
    /// This can be used to penalize a member that does not follow the
    /// protocol correctly, e.g. removing them from further key generation
    /// rounds.
    pub fn culprit(&self) -> Option<MemberIndex> {
        match self {
            Error::InvalidShare { culprit } => Some(*culprit),
            Error::Configuration(_)
            | Error::Field(_)
            | Error::Group(_)
            | Error::Chain(_)
            | Error::Transport(_)
            | Error::InvalidZeroIndex
            | Error::UnknownMember { .. }
            | Error::InvalidPeer { .. }
            | Error::UnexpectedReceiver { .. }
            | Error::IncorrectNumberOfCommitments
            | Error::InsufficientQualifiedMembers { .. }
            | Error::InsufficientRevealedShares { .. }
            | Error::PublicationTimeout
            | Error::GroupPublicKeyMismatch { .. }
            | Error::SelfMisbehaving { .. }
            | Error::SerializationError
            | Error::DeserializationError => None,
        }
    }

    /// Whether the error is one of the terminal fate decisions, i.e. a reason
    /// the member is not part of the operating group after the round.
    pub fn is_fate_decision(&self) -> bool {
        matches!(
            self,
            Error::PublicationTimeout
                | Error::GroupPublicKeyMismatch { .. }
                | Error::SelfMisbehaving { .. }
        )
    }
}

/// An error in the round configuration.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConfigurationError {
    /// The group must have between 1 and 255 members.
    #[error("group size must be between 1 and 255, got {0}")]
    InvalidGroupSize(usize),
    /// The dishonest threshold must be lower than the group size.
    #[error("dishonest threshold {threshold} must be lower than the group size {group_size}")]
    InvalidDishonestThreshold {
        /// The requested threshold.
        threshold: usize,
        /// The requested group size.
        group_size: usize,
    },
    /// A block window must span at least one block.
    #[error("{0} must be at least one block")]
    EmptyBlockWindow(&'static str),
    /// The last member becomes eligible to publish only after the
    /// publication timeout.
    #[error("last publication turn at {last_turn} blocks must come before the timeout of {timeout} blocks")]
    PublicationTurnsExceedTimeout {
        /// Blocks after the publication start of the last member's turn.
        last_turn: u64,
        /// The publication timeout, in blocks.
        timeout: u64,
    },
}

/// An error related to a scalar Field.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldError {
    /// The encoding of a group scalar was malformed.
    #[error("Malformed scalar encoding.")]
    MalformedScalar,
    /// This scalar MUST NOT be zero.
    #[error("Invalid for this scalar to be zero.")]
    InvalidZeroScalar,
}

/// An error related to a Group (usually an elliptic curve or constructed from one) or one of its Elements.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum GroupError {
    /// The encoding of a group element was malformed.
    #[error("Malformed group element encoding.")]
    MalformedElement,
    /// This element MUST NOT be the identity.
    #[error("Invalid for this element to be the identity.")]
    InvalidIdentityElement,
    /// This element MUST have (large) prime order.
    #[error("Invalid for this element to not have large prime order.")]
    InvalidNonPrimeOrderElement,
}

/// An error reported by the blockchain/relay collaborator.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ChainError {
    /// A result was already submitted for this round.
    #[error("DKG result already submitted")]
    ResultAlreadySubmitted,
    /// The chain connection is gone.
    #[error("chain connection closed")]
    Closed,
}

/// An error reported by the messaging collaborator.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TransportError {
    /// The receiver is not known to the transport.
    #[error("unknown receiver {0}")]
    UnknownReceiver(MemberIndex),
    /// The transport was shut down.
    #[error("transport closed")]
    Closed,
}
