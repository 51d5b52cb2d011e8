//! Proptest generators for property-based testing.

use proptest::prelude::*;

use onion_core::{Address, Keypair, Message, Params, PublicKey, SequenceRecord};
use onion::GenesisState;

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::from_bytes)
}

/// Generate a single-key public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| PublicKey::from(kp.public_key()))
}

/// Generate a multisig key with 1..=max_keys members and a valid threshold.
pub fn multisig_key(max_keys: usize) -> impl Strategy<Value = PublicKey> {
    prop::collection::vec(public_key(), 1..=max_keys).prop_flat_map(|keys| {
        let n = keys.len() as u32;
        (1..=n).prop_map(move |threshold| PublicKey::multisig(threshold, keys.clone()))
    })
}

/// Generate a message with a non-empty type url.
pub fn message() -> impl Strategy<Value = Message> {
    ("/[a-z]{1,8}\\.[A-Z][a-zA-Z]{0,15}", payload(64))
        .prop_map(|(type_url, value)| Message::new(type_url, value))
}

/// Generate a memo within the length limit.
pub fn memo() -> impl Strategy<Value = String> {
    "[ -~]{0,64}".prop_map(String::from)
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate valid params.
pub fn params() -> impl Strategy<Value = Params> {
    (1u64..=64).prop_map(|tx_sig_limit| Params { tx_sig_limit })
}

/// Generate sequence records with distinct addresses.
pub fn sequence_records(max_len: usize) -> impl Strategy<Value = Vec<SequenceRecord>> {
    prop::collection::btree_map(any::<[u8; 20]>(), any::<u64>(), 0..=max_len).prop_map(|map| {
        map.into_iter()
            .map(|(bytes, sequence)| SequenceRecord {
                address: Address::from_bytes(bytes),
                sequence,
            })
            .collect()
    })
}

/// Generate a valid genesis state.
pub fn genesis_state() -> impl Strategy<Value = GenesisState> {
    (params(), sequence_records(16))
        .prop_map(|(params, sequences)| GenesisState::new(params, sequences))
}
