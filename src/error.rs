use thiserror::Error;

use crate::{observation::merge::MergeError, sp3::ParsingError as Sp3ParsingError, tropo::MissingInputs};

/// Errors that may rise when extracting fields from a
/// [crate::bits::PackedMessage] or when building a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Requested bits lie beyond the message length,
    /// or more than 64 bits were requested at once.
    #[error("bits [{start}; +{count}] out of range (message is {len} bits long)")]
    OutOfRange {
        start: usize,
        count: usize,
        len: usize,
    },
    /// Navigation type, preamble or page identifier does not match
    /// the record being decoded.
    #[error("wrong message type")]
    WrongMessageType,
    /// Invalid input, or inconsistent content
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Builder is missing a mandatory message
    #[error("incomplete record: missing {0}")]
    Incomplete(&'static str),
}

/// Crate errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("decoding error: {0}")]
    Decode(#[from] DecodeError),
    /// Correction model can't be evaluated: some inputs are missing
    #[error("invalid model, missing inputs: {0:?}")]
    InvalidModel(MissingInputs),
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sp3 satellite id: {0}")]
    Sp3Parsing(#[from] Sp3ParsingError),
    #[error("merge error: {0}")]
    Merge(#[from] MergeError),
    #[error("ashtech: {0}")]
    Ashtech(#[from] crate::ashtech::Error),
}
