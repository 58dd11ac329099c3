//! The cooperative control loop driving the engine.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;

use crate::types::Command;

use super::SyncEngine;

impl SyncEngine {
    /// Run the engine's control loop until `Quit`, a closed command channel,
    /// or cancellation.
    ///
    /// Each iteration, in order: pump and handle every pending provider
    /// notification, drain every immediately-available command, advance the
    /// orchestrator one tick, then sleep one poll interval. Notifications
    /// and commands are therefore always processed on this task, in arrival
    /// order, with no handler running concurrently with another.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>, shutdown: CancellationToken) {
        tracing::info!(
            poll_interval_ms = self.config.poll_interval_ms,
            "control loop started"
        );

        loop {
            for notification in self.provider.poll_notifications().await {
                self.handle_notification(notification).await;
            }

            loop {
                match commands.try_recv() {
                    Ok(Command::Quit) => {
                        tracing::info!("quit requested");
                        return;
                    }
                    Ok(command) => self.handle_command(command).await,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        tracing::info!("command channel closed, stopping");
                        return;
                    }
                }
            }

            self.tick().await;

            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("shutdown requested");
                    return;
                }
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
            }
        }
    }
}
