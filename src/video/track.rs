//! Playback of a remote WebRTC video track

use std::sync::Arc;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_remote::TrackRemote;

use super::remote::{AttachedStream, RemoteVideo};

/// Largest RTP packet we expect on the wire
const RTP_READ_BUFFER: usize = 1500;

/// Attach `track` to `video` and start reading it.
///
/// Only the first video track is shown; anything else is ignored.
pub fn play(video: RemoteVideo, track: Arc<TrackRemote>) {
    if track.kind() != RTPCodecType::Video {
        tracing::info!("Ignoring non-video track {}", track.id());
        return;
    }

    let stream = AttachedStream {
        stream_id: track.stream_id(),
        track_id: track.id(),
    };
    let Some(mut stop_rx) = video.attach_stream(stream) else {
        return;
    };

    tokio::spawn(async move {
        let mut buf = vec![0u8; RTP_READ_BUFFER];
        loop {
            tokio::select! {
                _ = stop_rx.recv() => {
                    tracing::debug!("Playback stopped");
                    break;
                }
                result = track.read(&mut buf) => match result {
                    Ok((rtp_packet, _attributes)) => video.record_packet(&rtp_packet),
                    Err(e) => {
                        tracing::warn!("Error reading video track: {}", e);
                        break;
                    }
                },
            }
        }
    });
}
