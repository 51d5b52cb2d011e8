//! Error types for the keeper.

use onion_core::{Address, DecodeError, ValidationError};
use onion_store::StoreError;
use thiserror::Error;

/// Authentication failures. The first failing step wins.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Structural validation failed.
    #[error("malformed transaction: {0}")]
    MalformedTransaction(#[from] ValidationError),

    /// The router could not name a message's required signers.
    #[error("cannot resolve signers of message {index}: {cause}")]
    InvalidMessage {
        index: usize,
        #[source]
        cause: RoutingError,
    },

    /// A message requires a signer that is not in the signer list.
    #[error("message {index} requires signature from {signer}")]
    MissingSigner { index: usize, signer: Address },

    /// A supplied key does not derive the signer address at its position.
    #[error("pubkey does not match signer address {signer} with signer index: {index}")]
    PubKeyMismatch { index: usize, signer: Address },

    /// Summed key weight exceeds the params limit.
    #[error("signatures: {count}, limit: {limit}")]
    TooManySignatures { count: u64, limit: u64 },

    /// Signature count differs from signer count.
    #[error("invalid number of signer; expected: {expected}, got {got}")]
    Unauthorized { expected: usize, got: usize },

    /// The signer's account has no bound key.
    #[error("pubkey on account {0} is not set")]
    NoPubKey(Address),

    /// Claimed sequence differs from the stored one.
    #[error("onion sequence mismatch for {address}, expected {expected}, got {got}")]
    WrongSequence {
        address: Address,
        expected: u64,
        got: u64,
    },

    /// The stored sequence cannot advance any further.
    #[error("onion sequence for {0} is exhausted")]
    SequenceOverflow(Address),

    /// Cryptographic verification failed.
    #[error("signature verification failed for {address}; {reason}")]
    SignatureInvalid { address: Address, reason: String },

    /// The signer has no account where one is required.
    #[error("account {0} does not exist")]
    UnknownAddress(Address),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from message routing and handling.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// No handler is registered for the message type.
    #[error("unrecognized message type: {0}")]
    UnknownRoute(String),

    /// The message body could not be decoded or is invalid.
    #[error("invalid message {type_url}: {reason}")]
    InvalidMessage { type_url: String, reason: String },

    /// The handler refused the message against current state.
    #[error("message rejected: {0}")]
    Rejected(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// A message in the batch failed; the whole batch is failed.
#[derive(Debug, Error)]
#[error("message {failed_index} failed: {cause}")]
pub struct ExecError {
    pub failed_index: usize,
    #[source]
    pub cause: RoutingError,
}

/// Errors that can occur during keeper operations.
#[derive(Debug, Error)]
pub enum KeeperError {
    /// The event payload is not valid text-safe encoding.
    #[error("payload decoding error: {0}")]
    Payload(String),

    /// The transaction bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Execution failed.
    #[error("execution failed: {0}")]
    Exec(#[from] ExecError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A params update was signed by someone other than the authority.
    #[error("invalid authority; expected {expected}, got {got}")]
    InvalidAuthority { expected: Address, got: Address },

    /// Params failed validation.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Genesis state failed validation or parsing.
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),
}

/// Result type for keeper operations.
pub type Result<T> = std::result::Result<T, KeeperError>;
