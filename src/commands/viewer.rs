use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{ViewerCommand, HELP};
use crate::session::SessionController;
use crate::ui::ConsoleSurface;

/// How long an interrupted command may take to close its peer after shutdown
const INTERRUPT_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command. Failures are already on the surface, so only the flow is returned.
pub async fn execute(
    controller: &SessionController,
    surface: &ConsoleSurface,
    command: ViewerCommand,
) -> Flow {
    let result = match command {
        ViewerCommand::List => controller.load_screens().await.map(|_| ()),
        ViewerCommand::Select(value) => controller.select_screen(&value).map(|screen| {
            println!("Selected Screen {}", i64::from(screen) + 1);
        }),
        ViewerCommand::Start => controller.start(controller.selected_screen()).await,
        ViewerCommand::Stop => controller.stop().await,
        ViewerCommand::Toggle => controller.toggle().await.map(|_| ()),
        ViewerCommand::Status => {
            surface.render();
            println!("Session: {:?}", controller.phase());
            if let Some(stream) = controller.video().stream() {
                let stats = controller.video().stats();
                println!(
                    "Stream {}: {} packets, {} bytes, {} frames",
                    stream.stream_id, stats.packets, stats.bytes, stats.frames
                );
            }
            Ok(())
        }
        ViewerCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
        ViewerCommand::Quit => return Flow::Quit,
    };

    if let Err(e) = result {
        tracing::debug!("Command failed: {}", e);
    }
    Flow::Continue
}

/// Run one command while watching `interrupt`.
///
/// The command runs on its own task so that an interrupt during a long
/// negotiation still reaches the exit hook. After shutdown the command gets
/// a short grace period to close whatever peer it was building.
pub async fn execute_interruptible<I>(
    controller: Arc<SessionController>,
    surface: Arc<ConsoleSurface>,
    command: ViewerCommand,
    interrupt: I,
) -> Flow
where
    I: Future<Output = ()>,
{
    let mut task = {
        let controller = controller.clone();
        tokio::spawn(async move { execute(&controller, &surface, command).await })
    };

    tokio::select! {
        flow = &mut task => match flow {
            Ok(flow) => flow,
            Err(e) => {
                tracing::warn!("Command task failed: {}", e);
                Flow::Continue
            }
        },
        _ = interrupt => {
            tracing::info!("Interrupted");
            controller.shutdown().await;
            if tokio::time::timeout(INTERRUPT_GRACE, &mut task).await.is_err() {
                tracing::warn!("Command still running after shutdown, aborting it");
                task.abort();
            }
            Flow::Quit
        }
    }
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Read commands from stdin until quit, end of input or Ctrl-C, then run the exit hook
pub async fn run_prompt(
    controller: Arc<SessionController>,
    surface: Arc<ConsoleSurface>,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::info!("Input closed");
                        break;
                    }
                    Err(e) => {
                        controller.shutdown().await;
                        return Err(e);
                    }
                };
                match ViewerCommand::parse(&line) {
                    Ok(command) => {
                        let flow = execute_interruptible(
                            controller.clone(),
                            surface.clone(),
                            command,
                            interrupted(),
                        )
                        .await;
                        if flow == Flow::Quit {
                            break;
                        }
                    }
                    Err(message) => eprintln!("{}", message),
                }
            }
            _ = interrupted() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    controller.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{harness, two_screens, FakeBackend};
    use crate::session::SessionPhase;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_select_max_index() {
        let h = harness(two_screens());
        let surface = ConsoleSurface::new();

        let command = ViewerCommand::parse("select 2147483647").unwrap();
        let flow = execute(&h.controller, &surface, command).await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(h.controller.selected_screen(), i32::MAX);
    }

    #[tokio::test]
    async fn test_command_runs_to_completion_without_interrupt() {
        let h = harness(two_screens());
        let surface = Arc::new(ConsoleSurface::new());

        let flow = execute_interruptible(
            h.controller.clone(),
            surface,
            ViewerCommand::Start,
            std::future::pending(),
        )
        .await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(h.controller.phase(), SessionPhase::Active);
    }

    #[tokio::test]
    async fn test_interrupt_during_negotiation_runs_exit_hook() {
        let h = harness(FakeBackend {
            hold: true,
            ..two_screens()
        });
        let surface = Arc::new(ConsoleSurface::new());

        // Fires once the agent request is in flight, then lets it answer
        let backend = h.backend.clone();
        let interrupt = async move {
            backend.entered.notified().await;
            backend.release.notify_one();
        };

        let flow = execute_interruptible(
            h.controller.clone(),
            surface,
            ViewerCommand::Start,
            interrupt,
        )
        .await;

        assert_eq!(flow, Flow::Quit);
        assert_eq!(h.controller.phase(), SessionPhase::Closed);
        assert_eq!(h.factory.log.created.load(Ordering::SeqCst), 1);
        assert_eq!(h.factory.log.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_aborts_stuck_command() {
        let h = harness(FakeBackend {
            hold: true,
            ..two_screens()
        });
        let surface = Arc::new(ConsoleSurface::new());

        let backend = h.backend.clone();
        let interrupt = async move { backend.entered.notified().await };

        let flow = execute_interruptible(
            h.controller.clone(),
            surface,
            ViewerCommand::Start,
            interrupt,
        )
        .await;

        assert_eq!(flow, Flow::Quit);
        assert_eq!(h.controller.phase(), SessionPhase::Closed);
    }
}
