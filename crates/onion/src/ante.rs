//! Authentication of hook transactions.
//!
//! Steps run in a fixed order and the first failure wins. Steps 3 and 7 write
//! to state, so callers run this inside a branch they can discard.

use onion_core::{
    validate_basic, verify_signature, PendingTransaction, SequenceRecord, SignerData,
    HOOK_ACCOUNT_NUMBER,
};
use onion_store::KvStore;
use tracing::{debug, warn};

use crate::account::AccountRegistry;
use crate::error::AuthError;
use crate::keeper::Keeper;
use crate::router::MessageRouter;

impl<A: AccountRegistry, R: MessageRouter> Keeper<A, R> {
    /// Authenticate `tx` against `state` and advance every signer's sequence.
    ///
    /// 1. structural validation; every signer a message requires must be listed
    /// 2. supplied keys must derive their signer's address
    /// 3. missing accounts are created; unbound accounts get the supplied key
    /// 4. summed key weight must not exceed `tx_sig_limit`
    /// 5. one signature per signer
    /// 6. per signer: key bound, claimed sequence equals stored and can still
    ///    advance, signature valid
    /// 7. every signer's sequence goes up by one
    pub fn authenticate(
        &self,
        state: &mut dyn KvStore,
        tx: &PendingTransaction,
    ) -> Result<(), AuthError> {
        validate_basic(tx)?;

        let signers = tx.signers();
        let pub_keys = tx.public_keys();

        for (index, msg) in tx.messages().iter().enumerate() {
            let required = self
                .router()
                .signers(msg)
                .map_err(|cause| AuthError::InvalidMessage { index, cause })?;
            if let Some(signer) = required.into_iter().find(|s| !signers.contains(s)) {
                return Err(AuthError::MissingSigner { index, signer });
            }
        }

        for (index, (key, signer)) in pub_keys.iter().zip(&signers).enumerate() {
            if let Some(key) = key {
                if key.address() != *signer {
                    return Err(AuthError::PubKeyMismatch {
                        index,
                        signer: *signer,
                    });
                }
            }
        }

        for (key, signer) in pub_keys.iter().zip(&signers) {
            let (mut account, mut dirty) = match self.accounts().resolve(state, signer)? {
                Some(account) => (account, false),
                None => (self.accounts().create(state, signer)?, true),
            };
            if let Some(key) = key {
                dirty |= account.set_public_key((*key).clone());
            }
            if dirty {
                self.accounts().save(state, &account)?;
                debug!(%signer, bound = account.public_key.is_some(), "account saved");
            }
        }

        let limit = self.params(state)?.tx_sig_limit;
        let mut count: u64 = 0;
        for key in pub_keys.iter().flatten() {
            count = count.saturating_add(key.weight());
            if count > limit {
                return Err(AuthError::TooManySignatures { count, limit });
            }
        }

        let signatures = tx.signatures();
        if signatures.len() != signers.len() {
            return Err(AuthError::Unauthorized {
                expected: signers.len(),
                got: signatures.len(),
            });
        }

        let mut advanced = Vec::with_capacity(signers.len());
        for ((sig, signer), info) in signatures.iter().zip(&signers).zip(&tx.signer_infos) {
            let account = self
                .accounts()
                .resolve(state, signer)?
                .ok_or(AuthError::UnknownAddress(*signer))?;
            let key = account
                .public_key
                .as_ref()
                .ok_or(AuthError::NoPubKey(*signer))?;

            let current = self.sequence(state, signer)?.sequence;
            if info.sequence != current {
                return Err(AuthError::WrongSequence {
                    address: *signer,
                    expected: current,
                    got: info.sequence,
                });
            }
            let next = current
                .checked_add(1)
                .ok_or(AuthError::SequenceOverflow(*signer))?;

            let signer_data = SignerData::for_hook(*signer, self.chain_id(), current);
            if let Err(err) = verify_signature(key, sig, &tx.body, &signer_data) {
                let chain_id = self.chain_id();
                let reason = if sig.only_legacy_signers() {
                    format!(
                        "{err}; please verify account number ({HOOK_ACCOUNT_NUMBER}), \
                         sequence ({current}) and chain-id ({chain_id})"
                    )
                } else {
                    format!(
                        "{err}; please verify account number ({HOOK_ACCOUNT_NUMBER}) \
                         and chain-id ({chain_id})"
                    )
                };
                warn!(%signer, sequence = current, "hook signature rejected");
                return Err(AuthError::SignatureInvalid {
                    address: *signer,
                    reason,
                });
            }
            advanced.push(SequenceRecord {
                address: *signer,
                sequence: next,
            });
        }

        for record in &advanced {
            self.set_sequence(state, record)?;
            debug!(signer = %record.address, sequence = record.sequence, "sequence advanced");
        }

        Ok(())
    }
}
