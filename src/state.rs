use crate::store::SharedStore;
use std::sync::Arc;

pub type SharedState = axum::extract::State<Arc<State>>;
pub type NestedRouter = axum::Router<Arc<State>>;

/// Per-process state handed to every handler. Requests share nothing else.
#[derive(Debug, Clone)]
pub struct State {
    pub store: SharedStore,
}

impl State {
    pub fn new(store: SharedStore) -> State {
        State { store }
    }
}
