//! Definition of errors.

use core::fmt;

use std::error::Error;

pub type Result<T, E = TaggerError> = core::result::Result<T, E>;

#[derive(Debug)]
pub enum TaggerError {
    UntrainedTagger(UntrainedTaggerError),
    AlreadyTrained(AlreadyTrainedError),
    InvalidChainOrder(InvalidChainOrderError),
    EmptyGoldSet(EmptyGoldSetError),
    InvalidArgument(InvalidArgumentError),
    Regex(regex::Error),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl TaggerError {
    pub(crate) const fn untrained_tagger(order: usize) -> Self {
        Self::UntrainedTagger(UntrainedTaggerError { order })
    }

    pub(crate) const fn already_trained(order: usize) -> Self {
        Self::AlreadyTrained(AlreadyTrainedError { order })
    }

    pub(crate) fn invalid_chain_order<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidChainOrder(InvalidChainOrderError { msg: msg.into() })
    }

    pub(crate) const fn empty_gold_set() -> Self {
        Self::EmptyGoldSet(EmptyGoldSetError)
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }
}

impl fmt::Display for TaggerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UntrainedTagger(e) => e.fmt(f),
            Self::AlreadyTrained(e) => e.fmt(f),
            Self::InvalidChainOrder(e) => e.fmt(f),
            Self::EmptyGoldSet(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::Regex(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for TaggerError {}

/// Error used when a tagger is used before training.
#[derive(Debug)]
pub struct UntrainedTaggerError {
    /// Context order of the untrained tagger.
    pub(crate) order: usize,
}

impl fmt::Display for UntrainedTaggerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "UntrainedTaggerError: the order-{} tagger has not been trained",
            self.order
        )
    }
}

impl Error for UntrainedTaggerError {}

/// Error used when a frozen tagger is trained again.
#[derive(Debug)]
pub struct AlreadyTrainedError {
    /// Context order of the frozen tagger.
    pub(crate) order: usize,
}

impl fmt::Display for AlreadyTrainedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "AlreadyTrainedError: the order-{} tagger is already trained",
            self.order
        )
    }
}

impl Error for AlreadyTrainedError {}

/// Error used when a backoff chain is not strictly increasing.
#[derive(Debug)]
pub struct InvalidChainOrderError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidChainOrderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidChainOrderError: {}", self.msg)
    }
}

impl Error for InvalidChainOrderError {}

/// Error used when an evaluation is given no gold tokens.
#[derive(Debug)]
pub struct EmptyGoldSetError;

impl fmt::Display for EmptyGoldSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EmptyGoldSetError: accuracy is undefined without gold tokens")
    }
}

impl Error for EmptyGoldSetError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

impl From<regex::Error> for TaggerError {
    fn from(error: regex::Error) -> Self {
        Self::Regex(error)
    }
}

impl From<bincode::error::DecodeError> for TaggerError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for TaggerError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for TaggerError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
