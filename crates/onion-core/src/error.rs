//! Error types for Onion Core.

use thiserror::Error;

use crate::types::Address;

/// Core errors that can occur while handling keys, signatures and encodings.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("signature does not match the public key shape: {0}")]
    SignatureShape(String),
}

/// Errors produced by a [`TxCodec`](crate::codec::TxCodec).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty transaction bytes")]
    Empty,

    #[error("malformed transaction encoding: {0}")]
    Malformed(String),

    #[error("transaction encoding failed: {0}")]
    Encode(String),
}

/// Structural validation failures for a pending transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("transaction has no messages")]
    NoMessages,

    #[error("message {0} has an empty type url")]
    EmptyTypeUrl(usize),

    #[error("memo is too long: {len} bytes, max {max}")]
    MemoTooLong { len: usize, max: usize },

    #[error("transaction has no signers")]
    NoSigners,

    #[error("duplicate signer {0}")]
    DuplicateSigner(Address),

    #[error("transaction has no signatures")]
    NoSignatures,

    #[error("multisig threshold {threshold} is invalid for {keys} keys")]
    InvalidThreshold { threshold: u32, keys: usize },
}
