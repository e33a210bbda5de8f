//! Fakes behind the backend, peer and surface traits

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::SessionController;
use crate::api::{ScreenPayload, SessionBackend};
use crate::error::{Result, ViewerError};
use crate::peer::{PeerFactory, ScreenPeer};
use crate::ui::{ScreenOption, SurfaceState, ToggleLabel, ViewerSurface};
use crate::video::RemoteVideo;

pub(crate) const FAKE_OFFER: &str = "v=0 fake-offer";

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub screens: Vec<ScreenPayload>,
    pub fail_screens: bool,
    pub fail_session: bool,
    pub answer: String,
    pub sessions: Mutex<Vec<(String, i32)>>,
    /// When set, `start_session` parks until `release` is notified
    pub hold: bool,
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl SessionBackend for FakeBackend {
    async fn list_screens(&self) -> Result<Vec<ScreenPayload>> {
        if self.fail_screens {
            return Err(ViewerError::Status {
                endpoint: "/api/screens".to_string(),
                status: 503,
            });
        }
        Ok(self.screens.clone())
    }

    async fn start_session(&self, offer: &str, screen: i32) -> Result<String> {
        self.sessions.lock().push((offer.to_string(), screen));
        if self.hold {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if self.fail_session {
            return Err(ViewerError::Status {
                endpoint: "/api/session".to_string(),
                status: 500,
            });
        }
        Ok(self.answer.clone())
    }
}

#[derive(Default)]
pub(crate) struct PeerLog {
    pub created: AtomicUsize,
    pub closed: AtomicUsize,
    pub answers: Mutex<Vec<String>>,
}

struct FakePeer {
    log: Arc<PeerLog>,
    fail_offer: bool,
}

#[async_trait]
impl ScreenPeer for FakePeer {
    async fn create_offer(&self) -> Result<String> {
        if self.fail_offer {
            return Err(ViewerError::WebRtc("Failed to create offer: boom".to_string()));
        }
        Ok(FAKE_OFFER.to_string())
    }

    async fn apply_answer(&self, sdp: &str) -> Result<()> {
        self.log.answers.lock().push(sdp.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeFactory {
    pub log: Arc<PeerLog>,
    pub fail_offer: AtomicBool,
}

#[async_trait]
impl PeerFactory for FakeFactory {
    async fn create(&self, _video: RemoteVideo) -> Result<Box<dyn ScreenPeer>> {
        self.log.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePeer {
            log: self.log.clone(),
            fail_offer: self.fail_offer.load(Ordering::SeqCst),
        }))
    }
}

#[derive(Default)]
pub(crate) struct RecordingSurface {
    state: Mutex<SurfaceState>,
}

impl RecordingSurface {
    pub fn snapshot(&self) -> SurfaceState {
        self.state.lock().clone()
    }
}

impl ViewerSurface for RecordingSurface {
    fn show_error(&self, message: &str) {
        self.state.lock().error = Some(message.to_string());
    }

    fn set_screen_options(&self, options: Vec<ScreenOption>) {
        self.state.lock().options = options;
    }

    fn set_toggle_enabled(&self, enabled: bool) {
        self.state.lock().toggle_enabled = enabled;
    }

    fn set_toggle_label(&self, label: ToggleLabel) {
        self.state.lock().toggle_label = label;
    }

    fn set_video_visible(&self, visible: bool) {
        self.state.lock().video_visible = visible;
    }
}

pub(crate) struct Harness {
    pub backend: Arc<FakeBackend>,
    pub factory: Arc<FakeFactory>,
    pub surface: Arc<RecordingSurface>,
    pub controller: Arc<SessionController>,
}

pub(crate) fn harness(backend: FakeBackend) -> Harness {
    let backend = Arc::new(backend);
    let factory = Arc::new(FakeFactory::default());
    let surface = Arc::new(RecordingSurface::default());
    let controller = Arc::new(SessionController::new(
        backend.clone(),
        factory.clone(),
        surface.clone(),
    ));
    Harness {
        backend,
        factory,
        surface,
        controller,
    }
}

pub(crate) fn two_screens() -> FakeBackend {
    FakeBackend {
        screens: vec![ScreenPayload { index: 0 }, ScreenPayload { index: 1 }],
        answer: "v=0 agent-answer".to_string(),
        ..Default::default()
    }
}
