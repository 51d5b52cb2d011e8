//! # Onion Testkit
//!
//! Testing utilities for Onion.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: deterministic accounts and a [`TestApp`] wiring a keeper to in-memory state
//! - **Bank**: a toy balance ledger registered as a message handler
//! - **Generators**: Proptest strategies for keys, messages, params and genesis
//! - **Vectors**: sign-document vectors that must stay stable
//!
//! ## Test Fixtures
//!
//! ```rust
//! use onion_testkit::bank::MsgSend;
//! use onion_testkit::fixtures::{test_accounts, TestApp};
//!
//! let mut app = TestApp::new();
//! let accounts = test_accounts(2);
//! app.mint(&accounts[0].address, 10);
//!
//! let tx = app
//!     .tx()
//!     .message(MsgSend::new(accounts[0].address, accounts[1].address, 10).to_message())
//!     .sign(&accounts[0].keypair, 0)
//!     .build();
//! app.deliver_tx(&tx);
//!
//! assert_eq!(app.balance(&accounts[1].address), 10);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use onion_testkit::generators::genesis_state;
//!
//! proptest! {
//!     #[test]
//!     fn genesis_validates(genesis in genesis_state()) {
//!         prop_assert!(genesis.validate().is_ok());
//!     }
//! }
//! ```

pub mod bank;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use bank::{BankHandler, MsgSend, MSG_SEND_TYPE_URL};
pub use fixtures::{memo_for, test_accounts, test_keeper, TestAccount, TestApp, TEST_CHAIN_ID};
pub use vectors::{all_vectors, verify_all_vectors, SignDocVector};

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
