use std::sync::Arc;

use commons_store::Store;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
    /// Owner of everything created through the API until real sign-in exists.
    pub demo_user_id: u64,
}

impl AppStateInner {
    pub fn new(store: Store, demo_user_id: u64) -> AppState {
        Arc::new(Self {
            store,
            demo_user_id,
        })
    }
}
