use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatheringOutcome {
    Complete,
    TimedOut,
}

/// Wait for the ICE gatherer's completion signal.
///
/// `done` is the receiver returned by `gathering_complete_promise`; it yields
/// or closes once no further candidate will be produced. With a timeout the
/// wait gives up after `timeout` and the caller proceeds with whatever
/// candidates were gathered so far.
pub async fn wait_for_gathering(
    mut done: mpsc::Receiver<()>,
    timeout: Option<Duration>,
) -> GatheringOutcome {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, done.recv()).await {
            Ok(_) => GatheringOutcome::Complete,
            Err(_) => GatheringOutcome::TimedOut,
        },
        None => {
            let _ = done.recv().await;
            GatheringOutcome::Complete
        }
    }
}
