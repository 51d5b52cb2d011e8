//! The Keeper: owns the module's state namespace and ties the authenticator,
//! executor and hook gateway together.

use onion_core::{Address, Params, SequenceRecord};
use onion_store::{KvStore, StoreExt};
use tracing::info;

use crate::account::AccountRegistry;
use crate::error::{KeeperError, Result};
use crate::keys::{sequence_key, PARAMS_KEY, SEQUENCE_PREFIX};
use crate::router::MessageRouter;

/// Configuration for the Keeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeeperConfig {
    /// Chain identifier bound into every sign document.
    pub chain_id: String,
    /// The only address allowed to update params.
    pub authority: Address,
}

impl KeeperConfig {
    pub fn new(chain_id: impl Into<String>, authority: Address) -> Self {
        Self {
            chain_id: chain_id.into(),
            authority,
        }
    }
}

/// The main Keeper struct.
///
/// Holds no state of its own; every operation reads and writes through the
/// [`KvStore`] handed in by the caller, which may be a [`Branch`](onion_store::Branch).
pub struct Keeper<A: AccountRegistry, R: MessageRouter> {
    config: KeeperConfig,
    accounts: A,
    router: R,
}

impl<A: AccountRegistry, R: MessageRouter> Keeper<A, R> {
    /// Create a new keeper.
    pub fn new(config: KeeperConfig, accounts: A, router: R) -> Self {
        Self {
            config,
            accounts,
            router,
        }
    }

    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }

    pub fn chain_id(&self) -> &str {
        &self.config.chain_id
    }

    pub fn authority(&self) -> &Address {
        &self.config.authority
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sequences
    // ─────────────────────────────────────────────────────────────────────────

    /// Stored sequence for `address`, or a zero record if none exists.
    pub fn sequence(
        &self,
        state: &dyn KvStore,
        address: &Address,
    ) -> onion_store::Result<SequenceRecord> {
        Ok(state
            .get_record(&sequence_key(address))?
            .unwrap_or_else(|| SequenceRecord::new(*address)))
    }

    /// Write `record`, overwriting any existing record for its address.
    pub fn set_sequence(
        &self,
        state: &mut dyn KvStore,
        record: &SequenceRecord,
    ) -> onion_store::Result<()> {
        state.set_record(&sequence_key(&record.address), record)
    }

    /// Every stored sequence record, ordered by address bytes.
    pub fn all_sequences(&self, state: &dyn KvStore) -> onion_store::Result<Vec<SequenceRecord>> {
        state.scan_records(SEQUENCE_PREFIX)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Params
    // ─────────────────────────────────────────────────────────────────────────

    /// Stored params, or the defaults if none were ever written.
    pub fn params(&self, state: &dyn KvStore) -> onion_store::Result<Params> {
        Ok(state.get_record(PARAMS_KEY)?.unwrap_or_default())
    }

    /// Validate and store params.
    pub fn set_params(&self, state: &mut dyn KvStore, params: &Params) -> Result<()> {
        params.validate().map_err(KeeperError::InvalidParams)?;
        state.set_record(PARAMS_KEY, params)?;
        Ok(())
    }

    /// Replace params on behalf of `sender`, which must be the configured authority.
    pub fn update_params(
        &self,
        state: &mut dyn KvStore,
        sender: &Address,
        params: &Params,
    ) -> Result<()> {
        if *sender != self.config.authority {
            return Err(KeeperError::InvalidAuthority {
                expected: self.config.authority,
                got: *sender,
            });
        }
        self.set_params(state, params)?;
        info!(tx_sig_limit = params.tx_sig_limit, "params updated");
        Ok(())
    }
}
