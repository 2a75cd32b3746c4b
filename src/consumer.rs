use std::sync::Arc;

use log::{debug, trace, warn};

use crate::error::Error;
use crate::latest::Latest;
use crate::sync::traits::{ChannelReceiver, ChannelSender};
use crate::types::{ConsumerState, Message, TerminalReason, Tick};
use crate::view::View;

/// The polling side that requests updates and owns the decision to quit
pub struct Consumer<S, ST, SR>
where
    ST: ChannelSender<Message<S>>,
    SR: ChannelReceiver<Message<S>>,
{
    inbound_tx: ST,
    outbound_rx: SR,
    state: ConsumerState,
    quit_flag: bool,
    producer_done: bool,
    pending_request: bool,
    last_snapshot: Option<Arc<S>>,
    latest: Latest<S>,
}

impl<S, ST, SR> Consumer<S, ST, SR>
where
    ST: ChannelSender<Message<S>>,
    SR: ChannelReceiver<Message<S>>,
{
    /// Create a new Consumer instance over an existing channel pair
    pub fn new(inbound_tx: ST, outbound_rx: SR) -> Self {
        Self {
            inbound_tx,
            outbound_rx,
            state: ConsumerState::Active,
            quit_flag: false,
            producer_done: false,
            pending_request: false,
            last_snapshot: None,
            latest: Latest::new(),
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether the owner has asked to quit
    pub fn quit_flag(&self) -> bool {
        self.quit_flag
    }

    /// Whether the done notification has been observed
    pub fn producer_done(&self) -> bool {
        self.producer_done
    }

    /// Whether an update request is outstanding
    pub fn pending_request(&self) -> bool {
        self.pending_request
    }

    pub fn last_snapshot(&self) -> Option<&Arc<S>> {
        self.last_snapshot.as_ref()
    }

    /// Handle for readers outside the handshake, e.g. persistence
    pub fn latest(&self) -> Latest<S> {
        self.latest.clone()
    }

    /// One timer firing: request an update if none is outstanding, then drain.
    ///
    /// Never blocks. Returns [`Tick::Terminate`] once the consumer is terminal.
    pub fn on_timer_tick<V>(&mut self, view: &mut V) -> Result<Tick, Error>
    where
        V: View<S>,
    {
        if self.state.is_terminal() {
            return Err(Error::AlreadyTerminated);
        }

        if !self.quit_flag && !self.producer_done && !self.pending_request {
            self.send(Message::UpdateRequest, view)?;
            self.pending_request = true;
        }

        self.drain_outbound(view)
    }

    /// Process every message the producer has queued, without blocking.
    pub fn drain_outbound<V>(&mut self, view: &mut V) -> Result<Tick, Error>
    where
        V: View<S>,
    {
        if self.state.is_terminal() {
            return Err(Error::AlreadyTerminated);
        }

        loop {
            let msg = match self.outbound_rx.try_recv() {
                Ok(Some(msg)) => msg,
                Ok(None) => break,
                // A finished producer exits after our ack
                Err(_) if self.producer_done => break,
                Err(_) => return Err(self.disconnect(view)),
            };
            trace!("consumer received {}", msg.kind());

            match msg {
                Message::UpdateResponse(snapshot) => {
                    let snapshot = Arc::new(snapshot);
                    self.latest.store(Arc::clone(&snapshot));
                    self.pending_request = false;
                    view.on_snapshot(&snapshot);
                    self.last_snapshot = Some(snapshot);
                }
                Message::QuitResponse if self.quit_flag => {
                    self.close(TerminalReason::QuitAcknowledged, view);
                    return Ok(Tick::Terminate);
                }
                Message::DoneNotification if self.producer_done => {
                    warn!("consumer ignoring duplicate done_notification");
                }
                Message::DoneNotification => {
                    self.producer_done = true;
                    view.on_done();
                    if self.quit_flag {
                        // The producer will not answer our quit request now
                        self.close(TerminalReason::FinishedDuringQuit, view);
                        return Ok(Tick::Terminate);
                    }
                    self.send(Message::DoneAck, view)?;
                }
                other => {
                    warn!(
                        "consumer ignoring unexpected {} while {:?}",
                        other.kind(),
                        self.state
                    );
                }
            }
        }
        Ok(Tick::Continue)
    }

    /// Ask the producer to stop.
    ///
    /// If the producer already finished this closes immediately; otherwise a
    /// quit request is sent and nothing else is sent afterwards. Repeated
    /// calls are no-ops.
    pub fn request_quit<V>(&mut self, view: &mut V) -> Result<Tick, Error>
    where
        V: View<S>,
    {
        if self.state.is_terminal() {
            return Ok(Tick::Terminate);
        }
        if self.quit_flag {
            return Ok(Tick::Continue);
        }

        self.quit_flag = true;
        if self.producer_done {
            self.close(TerminalReason::QuitAfterDone, view);
            return Ok(Tick::Terminate);
        }

        self.send(Message::QuitRequest, view)?;
        self.transition(ConsumerState::AwaitingQuitAck);
        Ok(Tick::Continue)
    }

    fn send<V>(&mut self, msg: Message<S>, view: &mut V) -> Result<(), Error>
    where
        V: View<S>,
    {
        trace!("consumer sending {}", msg.kind());
        if self.inbound_tx.send(msg).is_err() {
            return Err(self.disconnect(view));
        }
        Ok(())
    }

    fn close<V>(&mut self, reason: TerminalReason, view: &mut V)
    where
        V: View<S>,
    {
        self.transition(ConsumerState::Closed);
        view.on_terminal(reason);
    }

    fn disconnect<V>(&mut self, view: &mut V) -> Error
    where
        V: View<S>,
    {
        warn!("producer disconnected while consumer was {:?}", self.state);
        self.transition(ConsumerState::Disconnected);
        view.on_terminal(TerminalReason::Disconnected);
        Error::ProducerDisconnected
    }

    fn transition(&mut self, next: ConsumerState) {
        debug!("consumer {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
