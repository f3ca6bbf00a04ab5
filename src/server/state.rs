//! Shared state injected into every handler.

use crate::pipeline::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}
