//! # workshop-sync
//!
//! Backend library for keeping a local collection of subscribed workshop
//! content in step with a remote content-distribution service.
//!
//! ## Design Philosophy
//!
//! workshop-sync is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Provider-agnostic** - The content service sits behind one trait
//! - **Single-tasked** - One cooperative loop owns all engine state; no locks
//! - **Event-driven outward** - Presentation layers subscribe to events and
//!   feed commands in; they never touch engine state
//!
//! The engine reconciles local install timestamps against remote revision
//! timestamps, classifies each item, and drains a strictly one-at-a-time
//! download queue with live progress.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use workshop_sync::{Command, Config, SyncEngine, run_until_signal};
//! # use workshop_sync::WorkshopProvider;
//! # fn connect_provider() -> Arc<dyn WorkshopProvider> { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider: Arc<dyn WorkshopProvider> = connect_provider();
//!     let engine = SyncEngine::new(provider, Config::default());
//!
//!     // Subscribe to events
//!     let mut events = engine.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let (commands, command_rx) = tokio::sync::mpsc::channel(8);
//!     commands.send(Command::List).await.ok();
//!
//!     // Run with automatic signal handling
//!     run_until_signal(engine, command_rx).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Core reconciliation and download-orchestration engine
pub mod engine;
/// Error types
pub mod error;
/// Timestamp and progress-line formatting
pub mod format;
/// Remote provider trait and notification types
pub mod provider;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use engine::{PendingAction, SyncEngine};
pub use error::{Error, ProviderError, Result};
pub use provider::{InstallInfo, Notification, QueryHandle, WorkshopProvider};
pub use types::{
    Command, Event, ItemId, ItemSnapshot, ItemState, ItemStatus, RemoteDetails, TransferProgress,
};

/// Helper function to run the engine's control loop with graceful signal handling.
///
/// Spawns [`SyncEngine::run`] and cancels it when a termination signal
/// arrives; returns once the loop has stopped (signal, `Quit` command, or
/// closed command channel).
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn run_until_signal(
    engine: SyncEngine,
    commands: tokio::sync::mpsc::Receiver<types::Command>,
) -> Result<()> {
    let shutdown = tokio_util::sync::CancellationToken::new();
    let mut control_loop = tokio::spawn(engine.run(commands, shutdown.clone()));

    tokio::select! {
        _ = wait_for_signal() => {
            shutdown.cancel();
            control_loop
                .await
                .map_err(|e| Error::Other(format!("control loop task failed: {e}")))?;
        }
        joined = &mut control_loop => {
            joined.map_err(|e| Error::Other(format!("control loop task failed: {e}")))?;
        }
    }

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration can fail in restricted environments (containers,
    // test sandboxes); fall back to the portable handler
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("SIGTERM received, stopping"),
                _ = sigint.recv() => tracing::info!("SIGINT received, stopping"),
            }
        }
        _ => {
            tracing::warn!("unix signal registration failed, falling back to ctrl_c");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
    }
}
