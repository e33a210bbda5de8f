//! Remote video surface
//! Shows the first received screen track and keeps receive statistics

mod remote;
mod track;

pub use remote::{AttachedStream, RemoteVideo, VideoPacketSender, VideoStats};
pub use track::play;
