//! Session lifecycle: screen discovery, negotiation and the start/stop toggle

mod controller;
mod state;
#[cfg(test)]
pub(crate) mod testing;

pub use controller::{SessionController, ToggleOutcome};
pub use state::SessionPhase;
