use std::sync::Arc;

use log::{debug, info, warn};

use crate::types::TerminalReason;

/// Display collaborator driven by the consumer.
///
/// Called synchronously while the consumer drains its channel, so
/// implementations must not block.
pub trait View<S> {
    /// A new snapshot arrived.
    fn on_snapshot(&mut self, snapshot: &Arc<S>);

    /// The producer reported that its computation is complete.
    fn on_done(&mut self) {}

    /// The consumer reached a terminal state.
    fn on_terminal(&mut self, reason: TerminalReason);
}

/// View that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl<S> View<S> for NullView {
    fn on_snapshot(&mut self, _snapshot: &Arc<S>) {}

    fn on_terminal(&mut self, _reason: TerminalReason) {}
}

/// View that reports progress through the `log` facade
#[derive(Debug, Default, Clone)]
pub struct LogView {
    snapshots: u64,
    terminal: Option<TerminalReason>,
}

impl LogView {
    /// Number of snapshots seen so far
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    pub fn terminal(&self) -> Option<TerminalReason> {
        self.terminal
    }
}

impl<S> View<S> for LogView {
    fn on_snapshot(&mut self, _snapshot: &Arc<S>) {
        self.snapshots += 1;
        debug!("snapshot #{} received", self.snapshots);
    }

    fn on_done(&mut self) {
        info!("computation is complete");
    }

    fn on_terminal(&mut self, reason: TerminalReason) {
        self.terminal = Some(reason);
        match reason {
            TerminalReason::Disconnected => warn!("producer disconnected"),
            other => info!("closed: {other:?}"),
        }
    }
}
