//! Signature data and verification.
//!
//! Signature data mirrors the key shape: a single signature for an Ed25519
//! key, and one optional slot per sub-key for a multisig key. Verification
//! and the legacy-mode check recurse over that structure.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{sign_document, SignerData};
use crate::crypto::Ed25519Signature;
use crate::error::CoreError;
use crate::keys::PublicKey;
use crate::tx::TxBody;

/// How a single signature's document was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignMode {
    /// Deterministic CBOR document.
    Direct,
    /// Sorted-key JSON document.
    LegacyJson,
}

/// Signature material attached to a transaction for one signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureData {
    Single {
        mode: SignMode,
        signature: Bytes,
    },
    /// One slot per sub-key of the matching multisig key, in key order.
    /// `None` marks a sub-key that did not sign.
    Multi { signatures: Vec<Option<SignatureData>> },
}

impl SignatureData {
    /// True when every leaf signature uses the legacy JSON mode.
    pub fn only_legacy_signers(&self) -> bool {
        match self {
            SignatureData::Single { mode, .. } => *mode == SignMode::LegacyJson,
            SignatureData::Multi { signatures } => signatures
                .iter()
                .flatten()
                .all(SignatureData::only_legacy_signers),
        }
    }
}

/// Verify `data` against `key` over the document built from `body` and
/// `signer`.
pub fn verify_signature(
    key: &PublicKey,
    data: &SignatureData,
    body: &TxBody,
    signer: &SignerData,
) -> Result<(), CoreError> {
    match (key, data) {
        (PublicKey::Ed25519(pk), SignatureData::Single { mode, signature }) => {
            let sig = Ed25519Signature::try_from(signature.as_ref())?;
            let doc = sign_document(*mode, body, signer);
            pk.verify(&doc, &sig)
        }
        (PublicKey::Multisig(multi), SignatureData::Multi { signatures }) => {
            if signatures.len() != multi.keys.len() {
                return Err(CoreError::SignatureShape(format!(
                    "multisig has {} keys but {} signature slots",
                    multi.keys.len(),
                    signatures.len()
                )));
            }

            let mut signed = 0u32;
            for (sub_key, slot) in multi.keys.iter().zip(signatures) {
                if let Some(sub_sig) = slot {
                    verify_signature(sub_key, sub_sig, body, signer)?;
                    signed += 1;
                }
            }

            if signed < multi.threshold {
                return Err(CoreError::InvalidSignature);
            }
            Ok(())
        }
        (PublicKey::Ed25519(_), SignatureData::Multi { .. }) => Err(CoreError::SignatureShape(
            "multisig data for a single key".into(),
        )),
        (PublicKey::Multisig(_), SignatureData::Single { .. }) => Err(CoreError::SignatureShape(
            "single signature for a multisig key".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::tx::Message;
    use crate::types::Address;

    fn body() -> TxBody {
        TxBody {
            messages: vec![Message::new("/test.Msg", b"abc".to_vec())],
            memo: String::new(),
        }
    }

    fn signer_data(key: &PublicKey) -> SignerData {
        SignerData::for_hook(key.address(), "test", 0)
    }

    fn sign(kp: &Keypair, mode: SignMode, signer: &SignerData) -> SignatureData {
        let doc = sign_document(mode, &body(), signer);
        SignatureData::Single {
            mode,
            signature: Bytes::copy_from_slice(kp.sign(&doc).as_bytes()),
        }
    }

    #[test]
    fn test_single_signature_verifies() {
        let kp = Keypair::from_seed(&[1; 32]);
        let key: PublicKey = kp.public_key().into();
        let sd = signer_data(&key);

        for mode in [SignMode::Direct, SignMode::LegacyJson] {
            let data = sign(&kp, mode, &sd);
            assert!(verify_signature(&key, &data, &body(), &sd).is_ok());
        }
    }

    #[test]
    fn test_wrong_signer_data_fails() {
        let kp = Keypair::from_seed(&[1; 32]);
        let key: PublicKey = kp.public_key().into();
        let sd = signer_data(&key);
        let data = sign(&kp, SignMode::Direct, &sd);

        let mut other = sd.clone();
        other.account_number = 1;
        assert!(verify_signature(&key, &data, &body(), &other).is_err());
    }

    #[test]
    fn test_multisig_threshold() {
        let kps: Vec<Keypair> = (1..=3u8).map(|i| Keypair::from_seed(&[i; 32])).collect();
        let key = PublicKey::multisig(2, kps.iter().map(|k| k.public_key().into()).collect());
        let sd = signer_data(&key);

        let two = SignatureData::Multi {
            signatures: vec![
                Some(sign(&kps[0], SignMode::Direct, &sd)),
                None,
                Some(sign(&kps[2], SignMode::Direct, &sd)),
            ],
        };
        assert!(verify_signature(&key, &two, &body(), &sd).is_ok());

        let one = SignatureData::Multi {
            signatures: vec![Some(sign(&kps[0], SignMode::Direct, &sd)), None, None],
        };
        assert!(verify_signature(&key, &one, &body(), &sd).is_err());
    }

    #[test]
    fn test_multisig_bad_sub_signature_fails() {
        let kps: Vec<Keypair> = (1..=2u8).map(|i| Keypair::from_seed(&[i; 32])).collect();
        let key = PublicKey::multisig(1, kps.iter().map(|k| k.public_key().into()).collect());
        let sd = signer_data(&key);

        // Second slot signed by the wrong key.
        let data = SignatureData::Multi {
            signatures: vec![
                Some(sign(&kps[0], SignMode::Direct, &sd)),
                Some(sign(&kps[0], SignMode::Direct, &sd)),
            ],
        };
        assert!(verify_signature(&key, &data, &body(), &sd).is_err());
    }

    #[test]
    fn test_shape_mismatch() {
        let kp = Keypair::from_seed(&[1; 32]);
        let key: PublicKey = kp.public_key().into();
        let sd = SignerData::for_hook(Address::from_bytes([0; 20]), "test", 0);
        let data = SignatureData::Multi { signatures: vec![] };
        assert!(matches!(
            verify_signature(&key, &data, &body(), &sd),
            Err(CoreError::SignatureShape(_))
        ));
    }

    #[test]
    fn test_only_legacy_signers() {
        let legacy = SignatureData::Single {
            mode: SignMode::LegacyJson,
            signature: Bytes::new(),
        };
        let direct = SignatureData::Single {
            mode: SignMode::Direct,
            signature: Bytes::new(),
        };
        assert!(legacy.only_legacy_signers());
        assert!(!direct.only_legacy_signers());

        let multi = SignatureData::Multi {
            signatures: vec![Some(legacy.clone()), None, Some(legacy.clone())],
        };
        assert!(multi.only_legacy_signers());

        let mixed = SignatureData::Multi {
            signatures: vec![Some(legacy), Some(direct)],
        };
        assert!(!mixed.only_legacy_signers());
    }
}
