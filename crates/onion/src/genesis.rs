//! Genesis import and export of params and sequences.

use std::collections::HashSet;

use onion_core::{Params, SequenceRecord};
use onion_store::KvStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::account::AccountRegistry;
use crate::error::{KeeperError, Result};
use crate::keeper::Keeper;
use crate::router::MessageRouter;

/// The module's slice of a chain genesis document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    #[serde(default)]
    pub sequences: Vec<SequenceRecord>,
}

impl GenesisState {
    pub fn new(params: Params, sequences: Vec<SequenceRecord>) -> Self {
        Self { params, sequences }
    }

    /// Params must be valid and no address may appear twice.
    pub fn validate(&self) -> Result<()> {
        self.params
            .validate()
            .map_err(|e| KeeperError::InvalidGenesis(format!("params: {e}")))?;

        let mut seen = HashSet::with_capacity(self.sequences.len());
        for record in &self.sequences {
            if !seen.insert(record.address) {
                return Err(KeeperError::InvalidGenesis(format!(
                    "duplicate sequence for {}",
                    record.address
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| KeeperError::InvalidGenesis(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| KeeperError::InvalidGenesis(e.to_string()))
    }
}

impl<A: AccountRegistry, R: MessageRouter> Keeper<A, R> {
    /// Load a genesis state. Fails without writing if it does not validate.
    pub fn init_genesis(&self, state: &mut dyn KvStore, genesis: &GenesisState) -> Result<()> {
        genesis.validate()?;
        self.set_params(state, &genesis.params)?;
        for record in &genesis.sequences {
            self.set_sequence(state, record)?;
        }
        info!(sequences = genesis.sequences.len(), "genesis loaded");
        Ok(())
    }

    /// Snapshot params and every stored sequence.
    pub fn export_genesis(&self, state: &dyn KvStore) -> Result<GenesisState> {
        Ok(GenesisState {
            params: self.params(state)?,
            sequences: self.all_sequences(state)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::StoreAccountRegistry;
    use crate::keeper::KeeperConfig;
    use crate::router::ServiceRouter;
    use onion_core::Address;
    use onion_store::MemoryStore;

    fn keeper() -> Keeper<StoreAccountRegistry, ServiceRouter> {
        Keeper::new(
            KeeperConfig::new("onion-test", Address::from_bytes([9; 20])),
            StoreAccountRegistry,
            ServiceRouter::new(),
        )
    }

    fn record(byte: u8, sequence: u64) -> SequenceRecord {
        SequenceRecord {
            address: Address::from_bytes([byte; 20]),
            sequence,
        }
    }

    #[test]
    fn test_export_empty_store() {
        let keeper = keeper();
        let store = MemoryStore::new();
        assert_eq!(keeper.export_genesis(&store).unwrap(), GenesisState::default());
    }

    #[test]
    fn test_import_export_sorts_by_address() {
        let keeper = keeper();
        let mut store = MemoryStore::new();
        let genesis = GenesisState::new(
            Params { tx_sig_limit: 4 },
            vec![record(3, 7), record(1, 2)],
        );

        keeper.init_genesis(&mut store, &genesis).unwrap();
        let exported = keeper.export_genesis(&store).unwrap();

        assert_eq!(exported.params, genesis.params);
        assert_eq!(exported.sequences, vec![record(1, 2), record(3, 7)]);
    }

    #[test]
    fn test_duplicate_addresses_rejected() {
        let keeper = keeper();
        let mut store = MemoryStore::new();
        let genesis = GenesisState::new(Params::default(), vec![record(1, 1), record(1, 2)]);

        let err = keeper.init_genesis(&mut store, &genesis).unwrap_err();
        assert!(matches!(err, KeeperError::InvalidGenesis(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_uses_hex_addresses() {
        let genesis = GenesisState::new(Params::default(), vec![record(0xab, 1)]);
        let json = genesis.to_json().unwrap();

        assert!(json.contains(&"ab".repeat(20)));
        assert_eq!(GenesisState::from_json(&json).unwrap(), genesis);
    }

    #[test]
    fn test_json_missing_sequences_defaults_empty() {
        let genesis = GenesisState::from_json(r#"{"params":{"tx_sig_limit":7}}"#).unwrap();
        assert_eq!(genesis, GenesisState::default());
    }
}
