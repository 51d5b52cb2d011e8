//! Strong type definitions for Onion.
//!
//! Addresses and persisted records are newtypes so they cannot be mixed up
//! with raw byte strings at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address, derived from a public key.
///
/// Serialized as a lowercase hex string so snapshots stay readable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(#[serde(with = "hex::serde")] pub [u8; ADDRESS_LEN]);

impl Address {
    /// Create an address from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Derive an address from an encoded public key: the first 20 bytes of
    /// its Blake3 hash.
    pub fn derive(key_bytes: &[u8]) -> Self {
        let hash = blake3::hash(key_bytes);
        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&hash.as_bytes()[..ADDRESS_LEN]);
        Self(arr)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != ADDRESS_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; ADDRESS_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; ADDRESS_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

/// Replay-protection counter for hook-authenticated transactions.
///
/// Independent of any native account sequence the host keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub address: Address,
    pub sequence: u64,
}

impl SequenceRecord {
    /// A fresh record at sequence zero.
    pub const fn new(address: Address) -> Self {
        Self {
            address,
            sequence: 0,
        }
    }
}

/// Default bound on the total signature weight of one transaction.
pub const DEFAULT_TX_SIG_LIMIT: u64 = 7;

/// Module parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Maximum summed key weight across all signers of one transaction.
    pub tx_sig_limit: u64,
}

impl Params {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.tx_sig_limit == 0 {
            return Err("tx_sig_limit must be positive".into());
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tx_sig_limit: DEFAULT_TX_SIG_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_roundtrip() {
        let addr = Address::from_bytes([0x42; ADDRESS_LEN]);
        let recovered = Address::from_hex(&addr.to_hex()).unwrap();
        assert_eq!(addr, recovered);
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        assert!(Address::from_hex("abcd").is_err());
    }

    #[test]
    fn test_address_serializes_as_hex() {
        let addr = Address::from_bytes([0xab; ADDRESS_LEN]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(ADDRESS_LEN)));
    }

    #[test]
    fn test_params_validate() {
        assert!(Params::default().validate().is_ok());
        assert!(Params { tx_sig_limit: 0 }.validate().is_err());
    }
}
