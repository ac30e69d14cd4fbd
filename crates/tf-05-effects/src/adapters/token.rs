//! Bearer token straight from the auth slice, so the chain always sends the
//! token of the session the store currently holds.

use std::sync::Arc;
use tf_02_request_middleware::TokenProvider;
use tf_03_state::Store;

#[derive(Debug, Clone)]
pub struct StoreTokenProvider {
    store: Arc<Store>,
}

impl StoreTokenProvider {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

impl TokenProvider for StoreTokenProvider {
    fn bearer_token(&self) -> Option<String> {
        self.store.select(|state| state.auth.token.clone())
    }
}
