//! Message routing.
//!
//! The executor knows nothing about message semantics. It hands each message
//! to a [`MessageRouter`], which the host fills with handlers keyed by type url.

use std::collections::HashMap;

use bytes::Bytes;
use onion_core::{Address, Message};
use onion_store::KvStore;

use crate::error::RoutingError;

/// Output of one handled message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageResult {
    /// Handler-defined response payload.
    pub data: Bytes,
    /// Human-readable log line.
    pub log: String,
}

impl MessageResult {
    pub fn new(data: impl Into<Bytes>, log: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            log: log.into(),
        }
    }
}

/// Handles one message type.
pub trait MessageHandler: Send + Sync {
    fn handle(
        &self,
        state: &mut dyn KvStore,
        msg: &Message,
    ) -> Result<MessageResult, RoutingError>;

    /// Addresses that must sign any transaction carrying `msg`.
    ///
    /// Handlers that move value on someone's behalf must name them here.
    /// The default requires no one.
    fn signers(&self, _msg: &Message) -> Result<Vec<Address>, RoutingError> {
        Ok(Vec::new())
    }
}

impl<F> MessageHandler for F
where
    F: Fn(&mut dyn KvStore, &Message) -> Result<MessageResult, RoutingError> + Send + Sync,
{
    fn handle(
        &self,
        state: &mut dyn KvStore,
        msg: &Message,
    ) -> Result<MessageResult, RoutingError> {
        self(state, msg)
    }
}

/// Dispatches messages to their handlers.
pub trait MessageRouter {
    fn dispatch(
        &self,
        state: &mut dyn KvStore,
        msg: &Message,
    ) -> Result<MessageResult, RoutingError>;

    /// Required signers of `msg`, as declared by its handler.
    fn signers(&self, msg: &Message) -> Result<Vec<Address>, RoutingError>;
}

/// Router backed by a type-url table.
#[derive(Default)]
pub struct ServiceRouter {
    handlers: HashMap<String, Box<dyn MessageHandler>>,
}

impl ServiceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `type_url`, replacing any previous handler.
    pub fn register(
        &mut self,
        type_url: impl Into<String>,
        handler: impl MessageHandler + 'static,
    ) -> &mut Self {
        self.handlers.insert(type_url.into(), Box::new(handler));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_handler(
        mut self,
        type_url: impl Into<String>,
        handler: impl MessageHandler + 'static,
    ) -> Self {
        self.register(type_url, handler);
        self
    }

    pub fn has_route(&self, type_url: &str) -> bool {
        self.handlers.contains_key(type_url)
    }
}

impl std::fmt::Debug for ServiceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<_> = self.handlers.keys().collect();
        routes.sort();
        f.debug_struct("ServiceRouter").field("routes", &routes).finish()
    }
}

impl MessageRouter for ServiceRouter {
    fn dispatch(
        &self,
        state: &mut dyn KvStore,
        msg: &Message,
    ) -> Result<MessageResult, RoutingError> {
        let handler = self
            .handlers
            .get(&msg.type_url)
            .ok_or_else(|| RoutingError::UnknownRoute(msg.type_url.clone()))?;
        handler.handle(state, msg)
    }

    // Unrouted messages require no signer here; dispatch reports them.
    fn signers(&self, msg: &Message) -> Result<Vec<Address>, RoutingError> {
        match self.handlers.get(&msg.type_url) {
            Some(handler) => handler.signers(msg),
            None => Ok(Vec::new()),
        }
    }
}
