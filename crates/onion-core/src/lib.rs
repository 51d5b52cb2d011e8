//! # Onion Core
//!
//! Pure primitives for Onion: addresses, keys, inner transactions and the
//! documents their signers sign.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`PendingTransaction`] - A decoded inner transaction
//! - [`PublicKey`] - An Ed25519 key or a threshold multisig key
//! - [`SignatureData`] - Single or multisig signature material
//! - [`Address`] - 20-byte account address derived from a key
//!
//! ## Sign documents
//!
//! Signers sign a document binding address, chain id, account number,
//! sequence and body. See the [`canonical`] module.

pub mod canonical;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod signature;
pub mod tx;
pub mod types;
pub mod validation;

pub use canonical::{sign_document, SignerData, HOOK_ACCOUNT_NUMBER};
pub use codec::{CborTxCodec, TxCodec};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CoreError, DecodeError, ValidationError};
pub use keys::{MultisigKey, PublicKey};
pub use signature::{verify_signature, SignMode, SignatureData};
pub use tx::{Message, PendingTransaction, SignerInfo, TxBody, TxBuilder};
pub use types::{Address, Params, SequenceRecord, ADDRESS_LEN, DEFAULT_TX_SIG_LIMIT};
pub use validation::{validate_basic, MAX_MEMO_LEN};
