//! Structural validation of inner transactions.
//!
//! These checks need no state: they run before any account lookup or
//! signature verification.

use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::tx::PendingTransaction;

/// Maximum memo length in bytes.
pub const MAX_MEMO_LEN: usize = 256;

/// Validate a transaction's self-consistency.
///
/// This performs:
/// - Non-empty message list, each with a type url
/// - Memo length bound
/// - At least one signer, no duplicates
/// - At least one signature
/// - Satisfiable multisig thresholds on supplied keys
pub fn validate_basic(tx: &PendingTransaction) -> Result<(), ValidationError> {
    // 1. Messages
    if tx.body.messages.is_empty() {
        return Err(ValidationError::NoMessages);
    }
    if let Some(idx) = tx.body.messages.iter().position(|m| m.type_url.is_empty()) {
        return Err(ValidationError::EmptyTypeUrl(idx));
    }

    // 2. Memo
    if tx.body.memo.len() > MAX_MEMO_LEN {
        return Err(ValidationError::MemoTooLong {
            len: tx.body.memo.len(),
            max: MAX_MEMO_LEN,
        });
    }

    // 3. Signers
    if tx.signer_infos.is_empty() {
        return Err(ValidationError::NoSigners);
    }
    let mut seen = BTreeSet::new();
    for info in &tx.signer_infos {
        if !seen.insert(info.address) {
            return Err(ValidationError::DuplicateSigner(info.address));
        }
    }

    // 4. Signatures
    if tx.signatures.is_empty() {
        return Err(ValidationError::NoSignatures);
    }

    // 5. Key shapes
    for key in tx.signer_infos.iter().filter_map(|s| s.public_key.as_ref()) {
        key.validate()?;
    }

    Ok(())
}
