//! Sequential execution of a transaction's messages.

use onion_core::PendingTransaction;
use onion_store::KvStore;
use tracing::debug;

use crate::account::AccountRegistry;
use crate::error::ExecError;
use crate::keeper::Keeper;
use crate::router::{MessageResult, MessageRouter};

impl<A: AccountRegistry, R: MessageRouter> Keeper<A, R> {
    /// Route every message in order, stopping at the first failure.
    ///
    /// Writes made by earlier messages stay in `state`; the caller discards
    /// the enclosing branch when this returns an error.
    pub fn execute(
        &self,
        state: &mut dyn KvStore,
        tx: &PendingTransaction,
    ) -> Result<Vec<MessageResult>, ExecError> {
        let messages = tx.messages();
        let mut results = Vec::with_capacity(messages.len());

        for (index, msg) in messages.iter().enumerate() {
            let result = self
                .router()
                .dispatch(state, msg)
                .map_err(|cause| ExecError {
                    failed_index: index,
                    cause,
                })?;
            debug!(index, type_url = %msg.type_url, "message executed");
            results.push(result);
        }

        Ok(results)
    }
}
