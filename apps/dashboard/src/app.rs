//! Application orchestrator: wires the fetcher, coordinator and view together.

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use anyhow::Context;
use growlab_poller::HttpFetcher;
use growlab_protocol::ResourceDescriptor;
use growlab_sync::{Coordinator, SyncEvent};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::view;

/// ANSI clear screen + cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Runs the dashboard until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let base_url = config.base_url();
    let descriptors = config.descriptors()?;

    let fetcher = HttpFetcher::with_timeout(base_url.clone(), config.request_timeout())?;
    let coordinator = Coordinator::new(Arc::new(fetcher));
    let mut events = coordinator
        .take_events()
        .context("coordinator event receiver already taken")?;

    coordinator.activate(descriptors.clone())?;
    tracing::info!(base_url = %base_url, "dashboard ready");
    draw(&view::render_dashboard(&coordinator, &descriptors))?;

    // -- Main loop: redraw on every sync event until shutdown --
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
            frame = next_frame(&coordinator, &descriptors, &mut events) => match frame {
                Some(frame) => draw(&frame)?,
                None => break,
            }
        }
    }

    coordinator.deactivate();
    Ok(())
}

/// Waits for the next sync event and renders the frame it calls for.
///
/// Failures redraw too: the last good data stays on screen and picks up its
/// stale flag once it stops refreshing. Returns `None` when the channel closes.
async fn next_frame(
    coordinator: &Coordinator,
    descriptors: &[ResourceDescriptor],
    events: &mut mpsc::Receiver<SyncEvent>,
) -> Option<String> {
    match events.recv().await? {
        SyncEvent::SnapshotUpdated { resource } => {
            tracing::debug!(resource = %resource, "snapshot updated");
        }
        // Already logged at warn by the coordinator.
        SyncEvent::FetchFailed(failure) => {
            tracing::debug!(resource = %failure.resource, "redrawing after failed fetch");
        }
    }
    Some(view::render_dashboard(coordinator, descriptors))
}

fn draw(frame: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if stdout.is_terminal() {
        stdout.write_all(CLEAR_SCREEN.as_bytes())?;
    }
    stdout.write_all(frame.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
