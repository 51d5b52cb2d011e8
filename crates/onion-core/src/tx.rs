//! Inner transactions: the decoded payload carried by an external event.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::{sign_document, SignerData, HOOK_ACCOUNT_NUMBER};
use crate::crypto::Keypair;
use crate::keys::PublicKey;
use crate::signature::{SignMode, SignatureData};
use crate::types::Address;

/// An opaque message routed by type url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub type_url: String,
    pub value: Bytes,
}

impl Message {
    pub fn new(type_url: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
        }
    }
}

/// The signed payload of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBody {
    pub messages: Vec<Message>,
    pub memo: String,
}

/// Per-signer authentication info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    pub address: Address,
    /// Key to bind on first use. May be omitted once the account has one.
    pub public_key: Option<PublicKey>,
    /// The replay-protection sequence the signer claims to be at.
    pub sequence: u64,
}

/// A decoded inner transaction awaiting authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub body: TxBody,
    pub signer_infos: Vec<SignerInfo>,
    /// One entry per signer, order-correlated with `signer_infos`.
    pub signatures: Vec<SignatureData>,
}

impl PendingTransaction {
    /// Signer addresses in order.
    pub fn signers(&self) -> Vec<Address> {
        self.signer_infos.iter().map(|s| s.address).collect()
    }

    /// Supplied public keys, one slot per signer.
    pub fn public_keys(&self) -> Vec<Option<&PublicKey>> {
        self.signer_infos.iter().map(|s| s.public_key.as_ref()).collect()
    }

    pub fn signatures(&self) -> &[SignatureData] {
        &self.signatures
    }

    pub fn messages(&self) -> &[Message] {
        &self.body.messages
    }

    /// Bytes a signer with the given metadata signs in `mode`.
    pub fn sign_bytes(&self, mode: SignMode, signer: &SignerData) -> Vec<u8> {
        sign_document(mode, &self.body, signer)
    }
}

enum PendingSigner {
    Single {
        keypair: Keypair,
        mode: SignMode,
        sequence: u64,
    },
    Multi {
        key: PublicKey,
        keypairs: Vec<Option<Keypair>>,
        sequence: u64,
    },
}

/// Builder for signed inner transactions.
///
/// Signatures are produced in [`TxBuilder::build`], after the body is final.
pub struct TxBuilder {
    body: TxBody,
    chain_id: String,
    account_number: u64,
    signers: Vec<PendingSigner>,
}

impl TxBuilder {
    /// Start a transaction for the given chain.
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            body: TxBody::default(),
            chain_id: chain_id.into(),
            account_number: HOOK_ACCOUNT_NUMBER,
            signers: Vec::new(),
        }
    }

    /// Append a message.
    pub fn message(mut self, msg: Message) -> Self {
        self.body.messages.push(msg);
        self
    }

    /// Replace all messages.
    pub fn messages(mut self, msgs: Vec<Message>) -> Self {
        self.body.messages = msgs;
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.body.memo = memo.into();
        self
    }

    /// Override the account number placed in sign documents.
    pub fn account_number(mut self, account_number: u64) -> Self {
        self.account_number = account_number;
        self
    }

    /// Add a single-key signer using the direct sign mode.
    pub fn sign(self, keypair: &Keypair, sequence: u64) -> Self {
        self.sign_with_mode(keypair, SignMode::Direct, sequence)
    }

    /// Add a single-key signer using the legacy JSON sign mode.
    pub fn sign_legacy(self, keypair: &Keypair, sequence: u64) -> Self {
        self.sign_with_mode(keypair, SignMode::LegacyJson, sequence)
    }

    pub fn sign_with_mode(mut self, keypair: &Keypair, mode: SignMode, sequence: u64) -> Self {
        self.signers.push(PendingSigner::Single {
            keypair: keypair.clone(),
            mode,
            sequence,
        });
        self
    }

    /// Add a multisig signer. `keypairs` holds one slot per sub-key of `key`;
    /// `None` leaves that slot unsigned.
    pub fn sign_multisig(
        mut self,
        key: PublicKey,
        keypairs: Vec<Option<Keypair>>,
        sequence: u64,
    ) -> Self {
        self.signers.push(PendingSigner::Multi {
            key,
            keypairs,
            sequence,
        });
        self
    }

    /// Sign and assemble the transaction.
    pub fn build(self) -> PendingTransaction {
        let mut signer_infos = Vec::with_capacity(self.signers.len());
        let mut signatures = Vec::with_capacity(self.signers.len());

        for pending in &self.signers {
            let (key, sequence, data) = match pending {
                PendingSigner::Single {
                    keypair,
                    mode,
                    sequence,
                } => {
                    let key = PublicKey::from(keypair.public_key());
                    let signer = self.signer_data(&key, *sequence);
                    let doc = sign_document(*mode, &self.body, &signer);
                    let data = SignatureData::Single {
                        mode: *mode,
                        signature: Bytes::copy_from_slice(keypair.sign(&doc).as_bytes()),
                    };
                    (key, *sequence, data)
                }
                PendingSigner::Multi {
                    key,
                    keypairs,
                    sequence,
                } => {
                    let signer = self.signer_data(key, *sequence);
                    let doc = sign_document(SignMode::Direct, &self.body, &signer);
                    let slots = keypairs
                        .iter()
                        .map(|kp| {
                            kp.as_ref().map(|kp| SignatureData::Single {
                                mode: SignMode::Direct,
                                signature: Bytes::copy_from_slice(kp.sign(&doc).as_bytes()),
                            })
                        })
                        .collect();
                    (key.clone(), *sequence, SignatureData::Multi { signatures: slots })
                }
            };

            signer_infos.push(SignerInfo {
                address: key.address(),
                public_key: Some(key),
                sequence,
            });
            signatures.push(data);
        }

        PendingTransaction {
            body: self.body,
            signer_infos,
            signatures,
        }
    }

    fn signer_data(&self, key: &PublicKey, sequence: u64) -> SignerData {
        SignerData {
            address: key.address(),
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
            sequence,
        }
    }
}
