use std::sync::Arc;

use stockroom_auth::TokenCodec;
use stockroom_infra::{LedgerEngine, Store};

/// Shared per-process services handed to handlers as an extension.
pub struct AppServices {
    store: Arc<dyn Store>,
    engine: LedgerEngine,
    tokens: Arc<TokenCodec>,
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenCodec>) -> Self {
        let engine = LedgerEngine::new(store.clone());
        Self {
            store,
            engine,
            tokens,
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// The only path to ledger writes; handlers never build entries themselves.
    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }
}
