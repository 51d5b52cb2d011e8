//! Canonical sign documents.
//!
//! A signer signs a document binding its address, the chain id, an account
//! number, its replay-protection sequence and the transaction body. Two
//! encodings exist, selected by [`SignMode`]:
//!
//! - `Direct`: RFC 8949 core deterministic CBOR (integer map keys in
//!   ascending order, shortest integer form, definite lengths, no floats).
//! - `LegacyJson`: compact JSON with lexicographically sorted keys and
//!   integers rendered as strings.

use serde_json::json;

use crate::signature::SignMode;
use crate::tx::TxBody;
use crate::types::Address;

/// Account number written into the sign document of every hook-authenticated
/// signer.
///
/// Hook signers have no native account number. Instead of leaving the field
/// empty, the document carries this fixed value, which also separates hook
/// signatures from signatures made for natively numbered accounts. Changing it
/// invalidates every payload signed against the old value.
pub const HOOK_ACCOUNT_NUMBER: u64 = u64::MAX;

/// Document field keys (integer keys for compact encoding).
mod keys {
    pub const ADDRESS: u64 = 0;
    pub const CHAIN_ID: u64 = 1;
    pub const ACCOUNT_NUMBER: u64 = 2;
    pub const SEQUENCE: u64 = 3;
    pub const BODY: u64 = 4;

    pub const BODY_MESSAGES: u64 = 0;
    pub const BODY_MEMO: u64 = 1;
}

/// Signer metadata bound into a sign document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerData {
    pub address: Address,
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
}

impl SignerData {
    /// Signer data for a hook-authenticated signer.
    pub fn for_hook(address: Address, chain_id: impl Into<String>, sequence: u64) -> Self {
        Self {
            address,
            chain_id: chain_id.into(),
            account_number: HOOK_ACCOUNT_NUMBER,
            sequence,
        }
    }
}

/// Produce the bytes a signer signs for the given mode.
pub fn sign_document(mode: SignMode, body: &TxBody, signer: &SignerData) -> Vec<u8> {
    match mode {
        SignMode::Direct => direct_sign_bytes(body, signer),
        SignMode::LegacyJson => legacy_json_sign_bytes(body, signer),
    }
}

/// Deterministic CBOR sign document.
pub fn direct_sign_bytes(body: &TxBody, signer: &SignerData) -> Vec<u8> {
    let mut buf = Vec::new();

    encode_uint(&mut buf, 5, 5);

    encode_uint(&mut buf, 0, keys::ADDRESS);
    encode_bytes(&mut buf, signer.address.as_bytes());

    encode_uint(&mut buf, 0, keys::CHAIN_ID);
    encode_text(&mut buf, &signer.chain_id);

    encode_uint(&mut buf, 0, keys::ACCOUNT_NUMBER);
    encode_uint(&mut buf, 0, signer.account_number);

    encode_uint(&mut buf, 0, keys::SEQUENCE);
    encode_uint(&mut buf, 0, signer.sequence);

    encode_uint(&mut buf, 0, keys::BODY);
    encode_body(&mut buf, body);

    buf
}

/// Encode the transaction body as a two-entry map.
fn encode_body(buf: &mut Vec<u8>, body: &TxBody) {
    encode_uint(buf, 5, 2);

    encode_uint(buf, 0, keys::BODY_MESSAGES);
    encode_uint(buf, 4, body.messages.len() as u64);
    for msg in &body.messages {
        encode_uint(buf, 4, 2);
        encode_text(buf, &msg.type_url);
        encode_bytes(buf, &msg.value);
    }

    encode_uint(buf, 0, keys::BODY_MEMO);
    encode_text(buf, &body.memo);
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Sorted-key JSON sign document for legacy signers.
pub fn legacy_json_sign_bytes(body: &TxBody, signer: &SignerData) -> Vec<u8> {
    let msgs: Vec<serde_json::Value> = body
        .messages
        .iter()
        .map(|m| json!({ "type": m.type_url, "value": hex::encode(&m.value) }))
        .collect();

    let doc = json!({
        "account_number": signer.account_number.to_string(),
        "address": signer.address.to_hex(),
        "chain_id": signer.chain_id,
        "memo": body.memo,
        "msgs": msgs,
        "sequence": signer.sequence.to_string(),
    });

    // serde_json's default map is a BTreeMap, so keys come out sorted.
    doc.to_string().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::Message;

    fn body() -> TxBody {
        TxBody {
            messages: vec![Message::new("/bank.MsgSend", b"payload".to_vec())],
            memo: String::new(),
        }
    }

    fn signer() -> SignerData {
        SignerData::for_hook(Address::from_bytes([0x11; 20]), "test", 0)
    }

    #[test]
    fn test_direct_bytes_deterministic() {
        assert_eq!(
            direct_sign_bytes(&body(), &signer()),
            direct_sign_bytes(&body(), &signer())
        );
    }

    #[test]
    fn test_direct_bytes_bind_account_number() {
        let mut other = signer();
        other.account_number = 1;
        assert_ne!(
            direct_sign_bytes(&body(), &signer()),
            direct_sign_bytes(&body(), &other)
        );
    }

    #[test]
    fn test_direct_bytes_bind_sequence_and_chain() {
        let mut seq = signer();
        seq.sequence = 1;
        let mut chain = signer();
        chain.chain_id = "other".into();

        let base = direct_sign_bytes(&body(), &signer());
        assert_ne!(base, direct_sign_bytes(&body(), &seq));
        assert_ne!(base, direct_sign_bytes(&body(), &chain));
    }

    #[test]
    fn test_direct_bytes_header() {
        let bytes = direct_sign_bytes(&body(), &signer());
        // map(5), key 0, bytes(20)
        assert_eq!(&bytes[..3], &[0xa5, 0x00, 0x54]);
    }

    #[test]
    fn test_uint_encoding_boundaries() {
        let cases: [(u64, &[u8]); 5] = [
            (23, &[0x17]),
            (24, &[0x18, 0x18]),
            (256, &[0x19, 0x01, 0x00]),
            (65536, &[0x1a, 0x00, 0x01, 0x00, 0x00]),
            (u64::MAX, &[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        ];
        for (n, expected) in cases {
            let mut buf = Vec::new();
            encode_uint(&mut buf, 0, n);
            assert_eq!(buf, expected, "encoding of {}", n);
        }
    }

    #[test]
    fn test_legacy_json_sorted_keys() {
        let bytes = legacy_json_sign_bytes(&body(), &signer());
        let text = String::from_utf8(bytes).unwrap();
        let account = text.find("\"account_number\"").unwrap();
        let sequence = text.find("\"sequence\"").unwrap();
        assert!(account < sequence);
        assert!(text.contains(&format!("\"account_number\":\"{}\"", u64::MAX)));
    }

    proptest::proptest! {
        #[test]
        fn test_distinct_sequences_distinct_documents(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
            proptest::prop_assume!(a != b);
            let mut sa = signer();
            sa.sequence = a;
            let mut sb = signer();
            sb.sequence = b;
            proptest::prop_assert_ne!(
                direct_sign_bytes(&body(), &sa),
                direct_sign_bytes(&body(), &sb)
            );
        }
    }

    #[test]
    fn test_modes_produce_different_documents() {
        assert_ne!(
            sign_document(SignMode::Direct, &body(), &signer()),
            sign_document(SignMode::LegacyJson, &body(), &signer())
        );
    }
}
