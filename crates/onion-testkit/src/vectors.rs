//! Sign-document test vectors.
//!
//! Fixed inputs whose sign documents must be stable across builds: a change
//! in the document encoding invalidates every memo signed before it.

use onion_core::{
    sign_document, verify_signature, Keypair, Message, PendingTransaction, PublicKey, SignMode,
    SignerData, TxBuilder,
};

/// A sign-document test vector.
#[derive(Debug, Clone)]
pub struct SignDocVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    pub chain_id: &'static str,
    pub sequence: u64,
    pub mode: SignMode,
    pub memo: &'static str,
    /// (type url, value) pairs.
    pub messages: &'static [(&'static str, &'static [u8])],
}

/// Get all sign-document vectors.
pub fn all_vectors() -> Vec<SignDocVector> {
    vec![
        SignDocVector {
            name: "direct single message",
            seed: [0x42; 32],
            chain_id: "onion-1",
            sequence: 0,
            mode: SignMode::Direct,
            memo: "",
            messages: &[("/onion.bank.v1.MsgSend", b"hello")],
        },
        SignDocVector {
            name: "direct two messages with memo",
            seed: [0x42; 32],
            chain_id: "onion-1",
            sequence: 24,
            mode: SignMode::Direct,
            memo: "swap then send",
            messages: &[("/dex.MsgSwap", b"\x01\x02"), ("/onion.bank.v1.MsgSend", b"")],
        },
        SignDocVector {
            name: "legacy json",
            seed: [0x07; 32],
            chain_id: "onion-1",
            sequence: 1_000_000,
            mode: SignMode::LegacyJson,
            memo: "legacy \"quoted\"",
            messages: &[("/onion.bank.v1.MsgSend", b"world")],
        },
    ]
}

/// Build and sign the transaction described by a vector.
pub fn transaction_from_vector(vector: &SignDocVector) -> PendingTransaction {
    let keypair = Keypair::from_seed(&vector.seed);
    let messages = vector
        .messages
        .iter()
        .map(|(type_url, value)| Message::new(*type_url, value.to_vec()))
        .collect();

    TxBuilder::new(vector.chain_id)
        .messages(messages)
        .memo(vector.memo)
        .sign_with_mode(&keypair, vector.mode, vector.sequence)
        .build()
}

/// The sign document of a vector, as the hook authenticator rebuilds it.
pub fn sign_document_for_vector(vector: &SignDocVector) -> Vec<u8> {
    let keypair = Keypair::from_seed(&vector.seed);
    let address = PublicKey::from(keypair.public_key()).address();
    let tx = transaction_from_vector(vector);
    let signer = SignerData::for_hook(address, vector.chain_id, vector.sequence);
    sign_document(vector.mode, &tx.body, &signer)
}

/// Check every vector's signature verifies against its rebuilt document.
///
/// Returns (name, verified, document hex).
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let keypair = Keypair::from_seed(&v.seed);
            let key = PublicKey::from(keypair.public_key());
            let tx = transaction_from_vector(v);
            let signer = SignerData::for_hook(key.address(), v.chain_id, v.sequence);
            let verified = verify_signature(&key, &tx.signatures[0], &tx.body, &signer).is_ok();

            (
                v.name.to_string(),
                verified,
                hex::encode(sign_document_for_vector(v)),
            )
        })
        .collect()
}
