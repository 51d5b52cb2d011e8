//! Public keys a signer can present: a single Ed25519 key or a threshold
//! multisig over nested keys.

use serde::{Deserialize, Serialize};

use crate::crypto::Ed25519PublicKey;
use crate::error::ValidationError;
use crate::types::Address;

/// Tag bytes for the canonical key encoding.
mod tags {
    pub const ED25519: u8 = 0x01;
    pub const MULTISIG: u8 = 0x02;
}

/// A signer's public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicKey {
    Ed25519(Ed25519PublicKey),
    Multisig(MultisigKey),
}

/// A k-of-n threshold key. Sub-keys may themselves be multisig keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultisigKey {
    pub threshold: u32,
    pub keys: Vec<PublicKey>,
}

impl PublicKey {
    /// Build a multisig key.
    pub fn multisig(threshold: u32, keys: Vec<PublicKey>) -> Self {
        PublicKey::Multisig(MultisigKey { threshold, keys })
    }

    /// Deterministic byte encoding used for address derivation.
    ///
    /// Format: `tag || key` for Ed25519, `tag || threshold || count || sub-keys`
    /// for multisig, integers big-endian.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_to(&mut buf);
        buf
    }

    fn encode_to(&self, buf: &mut Vec<u8>) {
        match self {
            PublicKey::Ed25519(pk) => {
                buf.push(tags::ED25519);
                buf.extend_from_slice(pk.as_bytes());
            }
            PublicKey::Multisig(m) => {
                buf.push(tags::MULTISIG);
                buf.extend_from_slice(&m.threshold.to_be_bytes());
                buf.extend_from_slice(&(m.keys.len() as u32).to_be_bytes());
                for key in &m.keys {
                    key.encode_to(buf);
                }
            }
        }
    }

    /// The address this key controls.
    pub fn address(&self) -> Address {
        Address::derive(&self.canonical_bytes())
    }

    /// Signature weight counted against the per-transaction limit.
    ///
    /// A simple key weighs 1; a multisig key weighs the sum of its sub-keys.
    pub fn weight(&self) -> u64 {
        match self {
            PublicKey::Ed25519(_) => 1,
            PublicKey::Multisig(m) => m.keys.iter().map(PublicKey::weight).sum(),
        }
    }

    /// Check multisig thresholds are satisfiable at every level.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            PublicKey::Ed25519(_) => Ok(()),
            PublicKey::Multisig(m) => {
                if m.threshold == 0 || m.threshold as usize > m.keys.len() {
                    return Err(ValidationError::InvalidThreshold {
                        threshold: m.threshold,
                        keys: m.keys.len(),
                    });
                }
                m.keys.iter().try_for_each(PublicKey::validate)
            }
        }
    }
}

impl From<Ed25519PublicKey> for PublicKey {
    fn from(pk: Ed25519PublicKey) -> Self {
        PublicKey::Ed25519(pk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    fn key(seed: u8) -> PublicKey {
        Keypair::from_seed(&[seed; 32]).public_key().into()
    }

    #[test]
    fn test_simple_key_weight() {
        assert_eq!(key(1).weight(), 1);
    }

    #[test]
    fn test_multisig_weight_counts_sub_keys() {
        let multi = PublicKey::multisig(2, vec![key(1), key(2), key(3)]);
        assert_eq!(multi.weight(), 3);
    }

    #[test]
    fn test_nested_multisig_weight() {
        let inner = PublicKey::multisig(1, vec![key(1), key(2)]);
        let outer = PublicKey::multisig(2, vec![inner, key(3), key(4)]);
        assert_eq!(outer.weight(), 4);
    }

    #[test]
    fn test_address_depends_on_threshold() {
        let a = PublicKey::multisig(1, vec![key(1), key(2)]);
        let b = PublicKey::multisig(2, vec![key(1), key(2)]);
        assert_ne!(a.address(), b.address());
        assert_ne!(key(1).address(), key(2).address());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(PublicKey::multisig(0, vec![key(1)]).validate().is_err());
        assert!(PublicKey::multisig(3, vec![key(1), key(2)]).validate().is_err());
        assert!(PublicKey::multisig(2, vec![key(1), key(2)]).validate().is_ok());

        let bad_inner = PublicKey::multisig(5, vec![key(1)]);
        assert!(PublicKey::multisig(1, vec![bad_inner, key(2)]).validate().is_err());
    }
}
