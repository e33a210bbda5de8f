use uuid::Uuid;

use crate::peer::ScreenPeer;

/// A negotiated connection and what it is showing
pub(crate) struct ActiveSession {
    pub id: Uuid,
    pub screen: i32,
    pub peer: Box<dyn ScreenPeer>,
}

/// Lifecycle of the single viewing slot. The peer handle only exists while active.
pub(crate) enum SessionState {
    Idle,
    Negotiating { id: Uuid },
    Active(ActiveSession),
    Closed,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Negotiating { .. } => SessionPhase::Negotiating,
            SessionState::Active(_) => SessionPhase::Active,
            SessionState::Closed => SessionPhase::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Negotiating,
    Active,
    /// The viewer is shutting down; no further sessions
    Closed,
}
