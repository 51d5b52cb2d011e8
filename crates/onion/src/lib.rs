//! # Onion
//!
//! Memo-triggered inner transactions. An external event (for example an
//! incoming transfer) carries a base64 memo holding a complete signed
//! transaction. The keeper authenticates it with its own replay-protection
//! sequences and executes its messages atomically.
//!
//! ## Pipeline
//!
//! 1. **Decode**: base64 memo, then the host's [`TxCodec`](onion_core::TxCodec)
//! 2. **Authenticate**: structure, key binding, weight limit, sequence, signatures
//! 3. **Execute**: route each message through a [`MessageRouter`]
//! 4. **Commit**: all writes land together, or none do
//!
//! ## Usage
//!
//! ```rust
//! use onion::{
//!     Keeper, KeeperConfig, MessageResult, RoutingError, ServiceRouter, StoreAccountRegistry,
//! };
//! use onion::core::{Address, CborTxCodec, Keypair, Message, TxBuilder, TxCodec};
//! use onion::store::{KvStore, MemoryStore};
//!
//! fn ping(_: &mut dyn KvStore, _: &Message) -> Result<MessageResult, RoutingError> {
//!     Ok(MessageResult::new(b"pong".to_vec(), "ping"))
//! }
//!
//! let config = KeeperConfig::new("onion-1", Address::from_bytes([0; 20]));
//! let router = ServiceRouter::new().with_handler("/demo.Ping", ping);
//! let keeper = Keeper::new(config, StoreAccountRegistry, router);
//! let mut state = MemoryStore::new();
//!
//! let tx = TxBuilder::new("onion-1")
//!     .message(Message::new("/demo.Ping", Vec::new()))
//!     .sign(&Keypair::generate(), 0)
//!     .build();
//! let memo = onion::encode_memo(&CborTxCodec.encode(&tx).unwrap());
//!
//! let results = keeper.submit_hook_tx(&mut state, &memo, &CborTxCodec).unwrap();
//! assert_eq!(results.len(), 1);
//! ```
//!
//! ## Re-exports
//!
//! - `onion::core` - keys, transactions, sign documents, codec
//! - `onion::store` - key-value state, branches, SQLite

pub mod account;
pub mod ante;
pub mod error;
pub mod execute;
pub mod genesis;
pub mod hook;
pub mod keeper;
pub mod keys;
pub mod router;

pub use onion_core as core;
pub use onion_store as store;

pub use account::{AccountRecord, AccountRegistry, StoreAccountRegistry};
pub use error::{AuthError, ExecError, KeeperError, Result, RoutingError};
pub use genesis::GenesisState;
pub use hook::{decode_memo, encode_memo};
pub use keeper::{Keeper, KeeperConfig};
pub use router::{MessageHandler, MessageResult, MessageRouter, ServiceRouter};

pub use onion_core::{Address, Keypair, Params, PendingTransaction, PublicKey, SequenceRecord};
