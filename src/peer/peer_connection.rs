use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::APIBuilder;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;

use super::gathering::{wait_for_gathering, GatheringOutcome};
use super::{PeerFactory, ScreenPeer};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::video::RemoteVideo;

/// Builds webrtc-rs peer connections that only receive video
pub struct RtcPeerFactory {
    stun_servers: Vec<String>,
    gathering_timeout: Option<Duration>,
}

impl RtcPeerFactory {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            stun_servers: config.stun_servers.clone(),
            gathering_timeout: config.gathering_timeout(),
        }
    }

    async fn create_peer_connection(&self) -> Result<Arc<RTCPeerConnection>> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()
            .map_err(|e| ViewerError::WebRtc(format!("Failed to register codecs: {}", e)))?;

        let mut registry = Registry::new();
        registry = register_default_interceptors(registry, &mut m)
            .map_err(|e| ViewerError::WebRtc(format!("Failed to register interceptors: {}", e)))?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // No STUN servers means host candidates only
        let ice_servers = if self.stun_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: self.stun_servers.clone(),
                ..Default::default()
            }]
        };
        let config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = api
            .new_peer_connection(config)
            .await
            .map_err(|e| ViewerError::WebRtc(format!("Failed to create peer connection: {}", e)))?;

        Ok(Arc::new(peer_connection))
    }
}

#[async_trait]
impl PeerFactory for RtcPeerFactory {
    async fn create(&self, video: RemoteVideo) -> Result<Box<dyn ScreenPeer>> {
        let pc = self.create_peer_connection().await?;

        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            tracing::info!("Peer connection state has changed: {}", s);
            Box::pin(async {})
        }));

        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            tracing::info!("Received track {} from stream {}", track.id(), track.stream_id());
            crate::video::play(video.clone(), track);
            Box::pin(async {})
        }));

        // Receive the screen, send nothing
        pc.add_transceiver_from_kind(
            RTPCodecType::Video,
            Some(RTCRtpTransceiverInit {
                direction: RTCRtpTransceiverDirection::Recvonly,
                send_encodings: vec![],
            }),
        )
        .await
        .map_err(|e| ViewerError::WebRtc(format!("Failed to add video transceiver: {}", e)))?;

        Ok(Box::new(RtcScreenPeer {
            pc,
            gathering_timeout: self.gathering_timeout,
        }))
    }
}

pub struct RtcScreenPeer {
    pc: Arc<RTCPeerConnection>,
    gathering_timeout: Option<Duration>,
}

#[async_trait]
impl ScreenPeer for RtcScreenPeer {
    async fn create_offer(&self) -> Result<String> {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .map_err(|e| ViewerError::WebRtc(format!("Failed to create offer: {}", e)))?;

        // Subscribe before gathering starts so the completion event can't be missed
        let gather_complete = self.pc.gathering_complete_promise().await;

        self.pc
            .set_local_description(offer)
            .await
            .map_err(|e| ViewerError::WebRtc(format!("Failed to set local description: {}", e)))?;

        if wait_for_gathering(gather_complete, self.gathering_timeout).await
            == GatheringOutcome::TimedOut
        {
            tracing::warn!(
                "ICE gathering did not finish within {:?}, sending partial candidates",
                self.gathering_timeout
            );
        }

        let local_desc = self
            .pc
            .local_description()
            .await
            .ok_or(ViewerError::MissingLocalDescription)?;

        Ok(local_desc.sdp)
    }

    async fn apply_answer(&self, sdp: &str) -> Result<()> {
        let answer = RTCSessionDescription::answer(sdp.to_string())
            .map_err(|e| ViewerError::WebRtc(format!("Failed to parse answer: {}", e)))?;

        self.pc
            .set_remote_description(answer)
            .await
            .map_err(|e| ViewerError::WebRtc(format!("Failed to set remote description: {}", e)))?;

        tracing::info!("Answer accepted, connection establishing...");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pc
            .close()
            .await
            .map_err(|e| ViewerError::WebRtc(format!("Failed to close peer connection: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_factory() -> RtcPeerFactory {
        RtcPeerFactory::new(&ViewerConfig {
            stun_servers: vec![],
            gathering_timeout_ms: Some(2000),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_offer_receives_video_only() {
        let peer = offline_factory().create(RemoteVideo::new()).await.unwrap();

        let offer = tokio::time::timeout(Duration::from_secs(10), peer.create_offer())
            .await
            .expect("offer not produced after gathering")
            .unwrap();

        assert!(offer.starts_with("v=0"));
        assert!(offer.contains("m=video"));
        assert!(offer.contains("a=recvonly"));
        assert!(!offer.contains("m=audio"));

        peer.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_garbage_answer_is_rejected() {
        let peer = offline_factory().create(RemoteVideo::new()).await.unwrap();
        peer.create_offer().await.unwrap();

        let err = peer.apply_answer("not sdp").await.unwrap_err();
        assert!(matches!(err, ViewerError::WebRtc(_)));

        peer.close().await.unwrap();
    }
}
