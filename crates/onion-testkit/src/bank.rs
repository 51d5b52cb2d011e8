//! A minimal balance ledger used as a message handler in tests.
//!
//! Just enough of a bank to show that message writes commit or vanish
//! together with the hook transaction that carried them.

use onion::{MessageHandler, MessageResult, RoutingError};
use onion_core::{Address, Message};
use onion_store::{decode_record, encode_record, prefixed_key, KvStore, StoreExt};
use serde::{Deserialize, Serialize};

/// Type url routed to [`BankHandler`].
pub const MSG_SEND_TYPE_URL: &str = "/onion.bank.v1.MsgSend";

/// Namespace for balances, keyed by address bytes.
pub const BALANCE_PREFIX: &[u8] = b"bank/";

/// Move `amount` from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

impl MsgSend {
    pub fn new(from: Address, to: Address, amount: u64) -> Self {
        Self { from, to, amount }
    }

    pub fn to_message(&self) -> Message {
        let value = encode_record(self).expect("MsgSend always encodes");
        Message::new(MSG_SEND_TYPE_URL, value)
    }
}

fn balance_key(address: &Address) -> Vec<u8> {
    prefixed_key(BALANCE_PREFIX, address.as_bytes())
}

/// Balance of `address`, zero if never credited.
pub fn balance(state: &dyn KvStore, address: &Address) -> onion_store::Result<u64> {
    Ok(state.get_record(&balance_key(address))?.unwrap_or(0))
}

pub fn set_balance(
    state: &mut dyn KvStore,
    address: &Address,
    amount: u64,
) -> onion_store::Result<()> {
    state.set_record(&balance_key(address), &amount)
}

/// Credit `amount` out of thin air.
pub fn mint(state: &mut dyn KvStore, address: &Address, amount: u64) -> onion_store::Result<()> {
    let current = balance(state, address)?;
    set_balance(state, address, current.saturating_add(amount))
}

fn decode_send(msg: &Message) -> Result<MsgSend, RoutingError> {
    decode_record(&msg.value).map_err(|e| RoutingError::InvalidMessage {
        type_url: msg.type_url.clone(),
        reason: e.to_string(),
    })
}

/// Handler for [`MsgSend`]. The sender must sign.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankHandler;

impl MessageHandler for BankHandler {
    fn handle(
        &self,
        state: &mut dyn KvStore,
        msg: &Message,
    ) -> Result<MessageResult, RoutingError> {
        let send = decode_send(msg)?;
        if send.amount == 0 {
            return Err(RoutingError::InvalidMessage {
                type_url: msg.type_url.clone(),
                reason: "amount must be positive".into(),
            });
        }

        let from_balance = balance(state, &send.from)?;
        let remaining = from_balance.checked_sub(send.amount).ok_or_else(|| {
            RoutingError::Rejected(format!(
                "insufficient funds: {} has {}, needs {}",
                send.from, from_balance, send.amount
            ))
        })?;
        set_balance(state, &send.from, remaining)?;

        let to_balance = balance(state, &send.to)?;
        let credited = to_balance
            .checked_add(send.amount)
            .ok_or_else(|| RoutingError::Rejected(format!("balance overflow for {}", send.to)))?;
        set_balance(state, &send.to, credited)?;

        Ok(MessageResult::new(
            Vec::new(),
            format!("sent {} from {} to {}", send.amount, send.from, send.to),
        ))
    }

    fn signers(&self, msg: &Message) -> Result<Vec<Address>, RoutingError> {
        Ok(vec![decode_send(msg)?.from])
    }
}
