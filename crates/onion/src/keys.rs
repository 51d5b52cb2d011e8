//! Store key layout owned by this module.

use onion_core::Address;
use onion_store::prefixed_key;

/// Namespace for sequence records, keyed by address bytes.
pub const SEQUENCE_PREFIX: &[u8] = b"onion/seq/";

/// Single key holding the module params.
pub const PARAMS_KEY: &[u8] = b"p_onion";

/// Namespace used by [`StoreAccountRegistry`](crate::account::StoreAccountRegistry).
pub const ACCOUNT_PREFIX: &[u8] = b"acc/";

/// Key of the sequence record for `address`.
pub fn sequence_key(address: &Address) -> Vec<u8> {
    prefixed_key(SEQUENCE_PREFIX, address.as_bytes())
}

/// Key of the account record for `address`.
pub fn account_key(address: &Address) -> Vec<u8> {
    prefixed_key(ACCOUNT_PREFIX, address.as_bytes())
}
