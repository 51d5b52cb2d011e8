//! Account registry: the host's account bookkeeping, seen through the
//! narrow interface the authenticator needs.

use onion_core::{Address, PublicKey};
use onion_store::{KvStore, Result, StoreExt};
use serde::{Deserialize, Serialize};

use crate::keys::account_key;

/// An account with an optionally bound public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: Address,
    pub public_key: Option<PublicKey>,
}

impl AccountRecord {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            public_key: None,
        }
    }

    /// Bind `key` if no key is bound yet. Returns whether the record changed.
    ///
    /// A bound key is never replaced.
    pub fn set_public_key(&mut self, key: PublicKey) -> bool {
        if self.public_key.is_some() {
            return false;
        }
        self.public_key = Some(key);
        true
    }
}

/// Resolves, creates and saves accounts.
///
/// All access goes through the state handed in by the caller, so writes made
/// during authentication land in the same branch as everything else.
pub trait AccountRegistry {
    /// Look up an account.
    fn resolve(&self, state: &dyn KvStore, address: &Address) -> Result<Option<AccountRecord>>;

    /// Build a new account record. It is not persisted until [`save`](Self::save).
    fn create(&self, state: &dyn KvStore, address: &Address) -> Result<AccountRecord>;

    /// Persist an account record.
    fn save(&self, state: &mut dyn KvStore, record: &AccountRecord) -> Result<()>;
}

/// Registry storing CBOR account records under [`ACCOUNT_PREFIX`](crate::keys::ACCOUNT_PREFIX).
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreAccountRegistry;

impl AccountRegistry for StoreAccountRegistry {
    fn resolve(&self, state: &dyn KvStore, address: &Address) -> Result<Option<AccountRecord>> {
        state.get_record(&account_key(address))
    }

    fn create(&self, _state: &dyn KvStore, address: &Address) -> Result<AccountRecord> {
        Ok(AccountRecord::new(*address))
    }

    fn save(&self, state: &mut dyn KvStore, record: &AccountRecord) -> Result<()> {
        state.set_record(&account_key(&record.address), record)
    }
}
