//! Hook gateway: turns an external event's memo into an authenticated,
//! atomically executed inner transaction.
//!
//! Everything happens inside one [`Branch`] of the caller's state. The branch
//! is committed only when authentication and every message succeed; any
//! failure drops it, so no account, sequence or handler write survives.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use onion_core::TxCodec;
use onion_store::{Branch, KvStore};
use tracing::{debug, info};

use crate::account::AccountRegistry;
use crate::error::{KeeperError, Result};
use crate::keeper::Keeper;
use crate::router::{MessageResult, MessageRouter};

/// Decode a memo into raw transaction bytes (standard padded base64).
pub fn decode_memo(memo: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(memo)
        .map_err(|e| KeeperError::Payload(e.to_string()))
}

/// Encode raw transaction bytes as a memo.
pub fn encode_memo(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

impl<A: AccountRegistry, R: MessageRouter> Keeper<A, R> {
    /// Decode, authenticate and execute the transaction carried in `memo`.
    ///
    /// On success the branch is committed into `state` and the per-message
    /// results are returned. On any error `state` is untouched.
    pub fn submit_hook_tx(
        &self,
        state: &mut dyn KvStore,
        memo: &str,
        codec: &dyn TxCodec,
    ) -> Result<Vec<MessageResult>> {
        let raw = decode_memo(memo)?;
        let tx = codec.decode(&raw)?;

        let mut branch = Branch::new(state);
        self.authenticate(&mut branch, &tx)?;
        let results = self.execute(&mut branch, &tx)?;
        branch.commit()?;

        info!(
            signers = tx.signer_infos.len(),
            messages = results.len(),
            "hook transaction committed"
        );
        Ok(results)
    }

    /// Entry point for the host's event hook.
    ///
    /// Errors are logged and swallowed so the surrounding event is never
    /// failed by its memo.
    pub fn on_external_event(&self, state: &mut dyn KvStore, memo: &str, codec: &dyn TxCodec) {
        if let Err(err) = self.submit_hook_tx(state, memo, codec) {
            debug!(error = %err, "hook transaction dropped");
        }
    }
}
