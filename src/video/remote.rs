use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use webrtc::rtp::packet::Packet as RtpPacket;

pub type VideoPacketSender = mpsc::UnboundedSender<bytes::Bytes>;

/// Identity of the remote stream currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedStream {
    pub stream_id: String,
    pub track_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoStats {
    pub packets: u64,
    pub bytes: u64,
    /// Completed frames, counted by the RTP marker bit
    pub frames: u64,
}

/// Where the received screen is rendered
///
/// Cheap to clone; clones share the same surface.
#[derive(Clone, Default)]
pub struct RemoteVideo {
    inner: Arc<RemoteVideoInner>,
}

#[derive(Default)]
struct RemoteVideoInner {
    stream: RwLock<Option<AttachedStream>>,
    stop_tx: RwLock<Option<mpsc::Sender<()>>>,
    stats: RwLock<VideoStats>,
    packet_tx: RwLock<Option<VideoPacketSender>>,
}

impl RemoteVideo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every received RTP payload to `tx`
    pub fn set_packet_receiver(&self, tx: VideoPacketSender) {
        *self.inner.packet_tx.write() = Some(tx);
    }

    pub fn stream(&self) -> Option<AttachedStream> {
        self.inner.stream.read().clone()
    }

    pub fn stats(&self) -> VideoStats {
        *self.inner.stats.read()
    }

    /// Attach a stream if none is attached yet.
    ///
    /// Returns the stop signal the playback task must watch, or `None` when
    /// another stream already occupies the surface.
    pub fn attach_stream(&self, stream: AttachedStream) -> Option<mpsc::Receiver<()>> {
        let mut current = self.inner.stream.write();
        if let Some(existing) = current.as_ref() {
            tracing::info!(
                "Ignoring stream {} ({}), already showing {}",
                stream.stream_id,
                stream.track_id,
                existing.stream_id
            );
            return None;
        }

        tracing::info!("Attached stream {} ({})", stream.stream_id, stream.track_id);
        let (stop_tx, stop_rx) = mpsc::channel(1);
        *current = Some(stream);
        *self.inner.stop_tx.write() = Some(stop_tx);
        *self.inner.stats.write() = VideoStats::default();
        Some(stop_rx)
    }

    pub fn record_packet(&self, packet: &RtpPacket) {
        {
            let mut stats = self.inner.stats.write();
            stats.packets += 1;
            stats.bytes += packet.payload.len() as u64;
            if packet.header.marker {
                stats.frames += 1;
            }
        }

        if let Some(tx) = self.inner.packet_tx.read().as_ref() {
            let _ = tx.send(packet.payload.clone());
        }
    }

    /// Stop playback and release the attached stream
    pub fn detach(&self) {
        if let Some(stop_tx) = self.inner.stop_tx.write().take() {
            let _ = stop_tx.try_send(());
        }
        if let Some(stream) = self.inner.stream.write().take() {
            let stats = self.stats();
            tracing::info!(
                "Detached stream {}: {} packets, {} bytes, {} frames",
                stream.stream_id,
                stats.packets,
                stats.bytes,
                stats.frames
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrtc::rtp::header::Header;

    fn stream(id: &str) -> AttachedStream {
        AttachedStream {
            stream_id: id.to_string(),
            track_id: format!("{}-video", id),
        }
    }

    fn packet(len: usize, marker: bool) -> RtpPacket {
        RtpPacket {
            header: Header {
                marker,
                ..Default::default()
            },
            payload: bytes::Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn test_only_first_stream_attaches() {
        let video = RemoteVideo::new();
        assert!(video.attach_stream(stream("a")).is_some());
        assert!(video.attach_stream(stream("b")).is_none());
        assert_eq!(video.stream(), Some(stream("a")));
    }

    #[test]
    fn test_stats_count_frames_by_marker() {
        let video = RemoteVideo::new();
        let _stop = video.attach_stream(stream("a"));

        video.record_packet(&packet(1000, false));
        video.record_packet(&packet(200, true));
        video.record_packet(&packet(300, true));

        assert_eq!(
            video.stats(),
            VideoStats {
                packets: 3,
                bytes: 1500,
                frames: 2
            }
        );
    }

    #[tokio::test]
    async fn test_detach_signals_playback_and_frees_surface() {
        let video = RemoteVideo::new();
        let mut stop_rx = video.attach_stream(stream("a")).unwrap();

        video.detach();
        assert!(stop_rx.recv().await.is_some());
        assert!(video.stream().is_none());
        assert!(video.attach_stream(stream("b")).is_some());
    }

    #[tokio::test]
    async fn test_packets_forwarded_to_receiver() {
        let video = RemoteVideo::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        video.set_packet_receiver(tx);

        video.record_packet(&packet(4, true));
        assert_eq!(rx.recv().await.unwrap().len(), 4);
    }
}
