//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use onion::{
    encode_memo, AccountRecord, AccountRegistry, Keeper, KeeperConfig, MessageResult,
    ServiceRouter, StoreAccountRegistry,
};
use onion_core::{
    Address, CborTxCodec, Keypair, PendingTransaction, PublicKey, TxBuilder, TxCodec,
};
use onion_store::{KvStore, MemoryStore};

use crate::bank::{self, BankHandler, MSG_SEND_TYPE_URL};

/// Chain id used by every fixture.
pub const TEST_CHAIN_ID: &str = "onion-test-1";

/// Seed of the params authority.
pub const AUTHORITY_SEED: [u8; 32] = [0xAA; 32];

/// A signer with its keypair, key and address.
#[derive(Clone)]
pub struct TestAccount {
    pub keypair: Keypair,
    pub public_key: PublicKey,
    pub address: Address,
}

impl TestAccount {
    /// Create an account with a random keypair.
    pub fn new() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(&seed))
    }

    fn from_keypair(keypair: Keypair) -> Self {
        let public_key = PublicKey::from(keypair.public_key());
        let address = public_key.address();
        Self {
            keypair,
            public_key,
            address,
        }
    }
}

impl Default for TestAccount {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple deterministic accounts for multi-party tests.
pub fn test_accounts(count: usize) -> Vec<TestAccount> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 1;
            TestAccount::with_seed(seed)
        })
        .collect()
}

/// Address of the params authority used by [`test_keeper`].
pub fn authority() -> Address {
    TestAccount::with_seed(AUTHORITY_SEED).address
}

/// A keeper on [`TEST_CHAIN_ID`] with the bank handler registered.
pub fn test_keeper() -> Keeper<StoreAccountRegistry, ServiceRouter> {
    let router = ServiceRouter::new().with_handler(MSG_SEND_TYPE_URL, BankHandler);
    Keeper::new(
        KeeperConfig::new(TEST_CHAIN_ID, authority()),
        StoreAccountRegistry,
        router,
    )
}

/// Encode a transaction as a memo with the CBOR codec.
pub fn memo_for(tx: &PendingTransaction) -> String {
    let bytes = CborTxCodec.encode(tx).expect("transaction always encodes");
    encode_memo(&bytes)
}

/// A keeper and in-memory state, driven like a host would drive them.
pub struct TestApp {
    pub keeper: Keeper<StoreAccountRegistry, ServiceRouter>,
    pub store: MemoryStore,
    pub codec: CborTxCodec,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            keeper: test_keeper(),
            store: MemoryStore::new(),
            codec: CborTxCodec,
        }
    }

    /// Start a transaction for this app's chain.
    pub fn tx(&self) -> TxBuilder {
        TxBuilder::new(TEST_CHAIN_ID)
    }

    /// Run `tx` through the request path, surfacing errors.
    pub fn submit(&mut self, tx: &PendingTransaction) -> onion::Result<Vec<MessageResult>> {
        self.keeper
            .submit_hook_tx(&mut self.store, &memo_for(tx), &self.codec)
    }

    /// Deliver a raw memo through the event hook.
    pub fn deliver(&mut self, memo: &str) {
        self.keeper
            .on_external_event(&mut self.store, memo, &self.codec);
    }

    /// Deliver `tx` through the event hook.
    pub fn deliver_tx(&mut self, tx: &PendingTransaction) {
        self.deliver(&memo_for(tx));
    }

    pub fn sequence(&self, address: &Address) -> u64 {
        self.keeper
            .sequence(&self.store, address)
            .expect("sequence read")
            .sequence
    }

    pub fn account(&self, address: &Address) -> Option<AccountRecord> {
        self.keeper
            .accounts()
            .resolve(&self.store, address)
            .expect("account read")
    }

    pub fn balance(&self, address: &Address) -> u64 {
        bank::balance(&self.store, address).expect("balance read")
    }

    pub fn mint(&mut self, address: &Address, amount: u64) {
        bank::mint(&mut self.store, address, amount).expect("mint");
    }

    /// Snapshot of every key-value pair, for before/after comparisons.
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.store.prefix_scan(b"").expect("scan")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::MsgSend;

    #[test]
    fn test_accounts_are_distinct_and_deterministic() {
        let a = test_accounts(3);
        let b = test_accounts(3);

        assert_eq!(a[0].address, b[0].address);
        assert_ne!(a[0].address, a[1].address);
        assert_ne!(a[1].address, a[2].address);
    }

    #[test]
    fn test_app_round_trip() {
        let mut app = TestApp::new();
        let [alice, bob]: [TestAccount; 2] = test_accounts(2).try_into().ok().unwrap();
        app.mint(&alice.address, 5);

        let tx = app
            .tx()
            .message(MsgSend::new(alice.address, bob.address, 5).to_message())
            .sign(&alice.keypair, 0)
            .build();
        app.submit(&tx).unwrap();

        assert_eq!(app.balance(&bob.address), 5);
        assert_eq!(app.sequence(&alice.address), 1);
        assert_eq!(
            app.account(&alice.address).unwrap().public_key,
            Some(alice.public_key)
        );
    }
}
