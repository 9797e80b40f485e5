//! # Web API Application State
//!
//! Shared state handed to every request handler.

use crate::emulator::SnsEmulator;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub emulator: Arc<SnsEmulator>,
}

impl AppState {
    pub fn new(emulator: SnsEmulator) -> Self {
        Self {
            emulator: Arc::new(emulator),
        }
    }
}
