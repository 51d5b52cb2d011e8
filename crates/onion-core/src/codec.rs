//! Transaction wire codec.
//!
//! The host decides how inner transactions are encoded on the wire; the
//! keeper only needs a [`TxCodec`]. [`CborTxCodec`] is the default.

use crate::error::DecodeError;
use crate::tx::PendingTransaction;

/// Encodes and decodes inner transactions.
pub trait TxCodec {
    fn encode(&self, tx: &PendingTransaction) -> Result<Vec<u8>, DecodeError>;

    fn decode(&self, bytes: &[u8]) -> Result<PendingTransaction, DecodeError>;
}

/// CBOR codec via ciborium.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborTxCodec;

impl TxCodec for CborTxCodec {
    fn encode(&self, tx: &PendingTransaction) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        ciborium::into_writer(tx, &mut buf).map_err(|e| DecodeError::Encode(e.to_string()))?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<PendingTransaction, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        ciborium::from_reader(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::tx::{Message, TxBuilder};

    #[test]
    fn test_cbor_roundtrip() {
        let kp = Keypair::from_seed(&[7; 32]);
        let tx = TxBuilder::new("test")
            .message(Message::new("/test.Msg", b"x".to_vec()))
            .memo("hi")
            .sign(&kp, 3)
            .build();

        let codec = CborTxCodec;
        let bytes = codec.encode(&tx).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), tx);
    }

    #[test]
    fn test_decode_garbage() {
        let codec = CborTxCodec;
        assert!(matches!(codec.decode(&[]), Err(DecodeError::Empty)));
        assert!(matches!(
            codec.decode(&[0xff, 0x00, 0x13]),
            Err(DecodeError::Malformed(_))
        ));
    }
}
