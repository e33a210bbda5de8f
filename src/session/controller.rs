use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::state::{ActiveSession, SessionPhase, SessionState};
use crate::api::{ScreenPayload, SessionBackend};
use crate::error::{Result, ViewerError};
use crate::peer::{PeerFactory, ScreenPeer};
use crate::ui::{screen_options, ToggleLabel, ViewerSurface};
use crate::video::RemoteVideo;

/// Screen requested when nothing has been selected
pub const DEFAULT_SCREEN: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Stopped,
}

/// Owns the single viewing session and keeps the surface in sync with it
pub struct SessionController {
    backend: Arc<dyn SessionBackend>,
    peers: Arc<dyn PeerFactory>,
    surface: Arc<dyn ViewerSurface>,
    video: RemoteVideo,
    state: Mutex<SessionState>,
    selected_screen: RwLock<i32>,
}

impl SessionController {
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        peers: Arc<dyn PeerFactory>,
        surface: Arc<dyn ViewerSurface>,
    ) -> Self {
        Self {
            backend,
            peers,
            surface,
            video: RemoteVideo::new(),
            state: Mutex::new(SessionState::Idle),
            selected_screen: RwLock::new(DEFAULT_SCREEN),
        }
    }

    pub fn video(&self) -> &RemoteVideo {
        &self.video
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase()
    }

    pub fn selected_screen(&self) -> i32 {
        *self.selected_screen.read()
    }

    /// Screen shown by the active session, if any
    pub fn active_screen(&self) -> Option<i32> {
        match &*self.state.lock() {
            SessionState::Active(active) => Some(active.screen),
            _ => None,
        }
    }

    /// Fetch the screen list and fill the selector.
    ///
    /// On failure the selector is left empty and the error is shown.
    pub async fn load_screens(&self) -> Result<Vec<ScreenPayload>> {
        match self.backend.list_screens().await {
            Ok(screens) => {
                self.surface.set_screen_options(screen_options(&screens));
                Ok(screens)
            }
            Err(e) => {
                tracing::warn!("Failed to load screens: {}", e);
                self.surface.set_screen_options(Vec::new());
                self.surface.show_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Apply a selector value. The blank entry selects the default screen.
    pub fn select_screen(&self, value: &str) -> Result<i32> {
        let value = value.trim();
        let screen = if value.is_empty() {
            DEFAULT_SCREEN
        } else {
            match value.parse::<i32>() {
                Ok(screen) => screen,
                Err(_) => return Err(self.report(ViewerError::InvalidScreen(value.to_string()))),
            }
        };

        *self.selected_screen.write() = screen;
        tracing::debug!("Selected screen {}", screen);
        Ok(screen)
    }

    /// Start/stop button: start a session on the selected screen when idle,
    /// stop the current one when active
    pub async fn toggle(&self) -> Result<ToggleOutcome> {
        match self.phase() {
            SessionPhase::Active => self.stop().await.map(|_| ToggleOutcome::Stopped),
            _ => self
                .start(self.selected_screen())
                .await
                .map(|_| ToggleOutcome::Started),
        }
    }

    /// Negotiate a session for `screen` and make it the active one.
    ///
    /// The toggle stays disabled for the whole negotiation and is re-enabled
    /// on both outcomes. A failed start leaves the toggle labelled "Start".
    pub async fn start(&self, screen: i32) -> Result<()> {
        let id = Uuid::new_v4();
        {
            let mut state = self.state.lock();
            let rejected = match &*state {
                SessionState::Idle => None,
                SessionState::Negotiating { .. } => Some(ViewerError::Busy),
                SessionState::Active(_) => Some(ViewerError::AlreadyActive),
                SessionState::Closed => Some(ViewerError::Closed),
            };
            if let Some(e) = rejected {
                drop(state);
                return Err(self.report(e));
            }
            *state = SessionState::Negotiating { id };
        }

        self.surface.set_toggle_enabled(false);

        let span = tracing::info_span!("session", %id, screen);
        let result = self.negotiate(screen).instrument(span.clone()).await;

        match result {
            Ok(peer) => {
                // Shutdown may have happened while negotiating
                let orphan = {
                    let mut state = self.state.lock();
                    if self.is_current(&state, id) {
                        *state = SessionState::Active(ActiveSession { id, screen, peer });
                        None
                    } else {
                        Some(peer)
                    }
                };

                if let Some(peer) = orphan {
                    span.in_scope(|| tracing::info!("Viewer closed during negotiation"));
                    if let Err(e) = peer.close().await {
                        tracing::warn!("Failed to close abandoned peer: {}", e);
                    }
                    self.video.detach();
                    self.surface.set_toggle_enabled(true);
                    self.surface.set_toggle_label(ToggleLabel::Start);
                    return Err(ViewerError::Closed);
                }

                span.in_scope(|| tracing::info!("Session active"));
                self.surface.set_video_visible(true);
                self.surface.set_toggle_enabled(true);
                self.surface.set_toggle_label(ToggleLabel::Stop);
                Ok(())
            }
            Err(e) => {
                {
                    let mut state = self.state.lock();
                    if self.is_current(&state, id) {
                        *state = SessionState::Idle;
                    }
                }

                span.in_scope(|| tracing::warn!("Session failed to start: {}", e));
                let e = self.report(e);
                self.surface.set_toggle_enabled(true);
                self.surface.set_toggle_label(ToggleLabel::Start);
                Err(e)
            }
        }
    }

    /// Build a peer, trade its offer for the agent's answer and apply it.
    ///
    /// A partially negotiated peer is closed before the error is returned.
    pub async fn negotiate(&self, screen: i32) -> Result<Box<dyn ScreenPeer>> {
        let peer = self.peers.create(self.video.clone()).await?;

        match self.exchange(peer.as_ref(), screen).await {
            Ok(()) => Ok(peer),
            Err(e) => {
                if let Err(close_err) = peer.close().await {
                    tracing::warn!("Failed to close peer after error: {}", close_err);
                }
                self.video.detach();
                Err(e)
            }
        }
    }

    async fn exchange(&self, peer: &dyn ScreenPeer, screen: i32) -> Result<()> {
        let offer = peer.create_offer().await?;
        tracing::debug!("Local offer ready ({} bytes)", offer.len());

        let answer = self.backend.start_session(&offer, screen).await?;
        peer.apply_answer(&answer).await
    }

    /// Close the active session and reset the controls
    pub async fn stop(&self) -> Result<()> {
        let active = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, SessionState::Idle) {
                SessionState::Active(active) => active,
                other => {
                    *state = other;
                    drop(state);
                    return Err(self.report(ViewerError::NotActive));
                }
            }
        };

        self.release(active).await;
        self.surface.set_toggle_enabled(true);
        self.surface.set_toggle_label(ToggleLabel::Start);
        self.surface.set_video_visible(false);
        Ok(())
    }

    /// Exit hook: close any live connection whatever the current state.
    ///
    /// Afterwards the controller refuses new sessions, and a negotiation
    /// still in flight closes its peer when it completes.
    pub async fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), SessionState::Closed);
        match previous {
            SessionState::Active(active) => {
                self.release(active).await;
                self.surface.set_video_visible(false);
            }
            SessionState::Negotiating { id } => {
                tracing::info!(%id, "Shutdown while negotiating");
            }
            SessionState::Idle | SessionState::Closed => {}
        }
    }

    async fn release(&self, active: ActiveSession) {
        if let Err(e) = active.peer.close().await {
            tracing::warn!(id = %active.id, "Failed to close peer connection: {}", e);
        }
        self.video.detach();
        tracing::info!(id = %active.id, "Session on screen {} closed", active.screen);
    }

    fn is_current(&self, state: &SessionState, id: Uuid) -> bool {
        matches!(state, SessionState::Negotiating { id: current } if *current == id)
    }

    fn report(&self, e: ViewerError) -> ViewerError {
        self.surface.show_error(&e.to_string());
        e
    }
}
