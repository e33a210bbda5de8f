//! WebRTC side of a viewing session

mod gathering;
mod peer_connection;

use async_trait::async_trait;

use crate::error::Result;
use crate::video::RemoteVideo;

pub use peer_connection::RtcPeerFactory;

/// One receive-only peer connection towards the agent
#[async_trait]
pub trait ScreenPeer: Send + Sync {
    /// Create the local offer and return its SDP once ICE gathering is done
    async fn create_offer(&self) -> Result<String>;

    /// Apply the agent's SDP as the remote "answer"
    async fn apply_answer(&self, sdp: &str) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait PeerFactory: Send + Sync {
    /// Build a peer whose incoming video is shown on `video`
    async fn create(&self, video: RemoteVideo) -> Result<Box<dyn ScreenPeer>>;
}
