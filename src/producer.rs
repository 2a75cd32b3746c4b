use log::{debug, trace, warn};

use crate::computation::Computation;
use crate::config::Config;
use crate::error::Error;
use crate::sync::traits::{ChannelReceiver, ChannelSender};
use crate::types::{Control, Message, ProducerState};

/// The side that runs the long computation and answers the consumer
pub struct Producer<S, SR, ST>
where
    SR: ChannelReceiver<Message<S>>,
    ST: ChannelSender<Message<S>>,
{
    inbound_rx: SR,
    outbound_tx: ST,
    state: ProducerState,
    quit_requested: bool,
    finished: bool,
    _phantom: std::marker::PhantomData<S>,
}

impl<S, SR, ST> Producer<S, SR, ST>
where
    SR: ChannelReceiver<Message<S>>,
    ST: ChannelSender<Message<S>>,
{
    /// Create a new Producer instance over an existing channel pair
    pub fn new(inbound_rx: SR, outbound_tx: ST) -> Self {
        Self {
            inbound_rx,
            outbound_tx,
            state: ProducerState::Running,
            quit_requested: false,
            finished: false,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn state(&self) -> ProducerState {
        self.state
    }

    /// Whether a quit request has been observed
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Whether the done notification has been sent
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Drain pending control messages without blocking.
    ///
    /// Answers at most one update request per call, taking the snapshot
    /// lazily. Returns [`Control::Stop`] once a quit request is seen; the
    /// producer is then `Exiting` and must not be polled again.
    pub fn poll_control<F>(&mut self, mut snapshot: F) -> Result<Control, Error>
    where
        F: FnMut() -> S,
    {
        self.ensure_running()?;

        let mut answered = false;
        loop {
            let msg = match self.inbound_rx.try_recv() {
                Ok(Some(msg)) => msg,
                Ok(None) => break,
                Err(_) => return Err(self.disconnect()),
            };
            trace!("producer received {}", msg.kind());

            match msg {
                Message::QuitRequest => {
                    self.quit_requested = true;
                    self.send(Message::QuitResponse)?;
                    self.transition(ProducerState::Exiting);
                    return Ok(Control::Stop);
                }
                Message::UpdateRequest if answered => {
                    trace!("producer coalesced redundant update request");
                }
                Message::UpdateRequest => {
                    answered = true;
                    self.send(Message::UpdateResponse(snapshot()))?;
                }
                other => {
                    warn!("producer ignoring unexpected {} while running", other.kind());
                }
            }
        }
        Ok(Control::Continue)
    }

    /// Send an update nobody asked for.
    ///
    /// Legal at any time while running; the consumer accepts it but keeps its
    /// own request cadence.
    pub fn push_update(&mut self, snapshot: S) -> Result<(), Error> {
        self.ensure_running()?;
        self.send(Message::UpdateResponse(snapshot))
    }

    /// Publish the final snapshot and the done notification, then block
    /// until the consumer releases us.
    ///
    /// Ends in `Done` on a done acknowledgement, or in `Exiting` on a quit
    /// request. No quit response is ever sent after the done notification.
    pub fn finalize(&mut self, final_snapshot: S) -> Result<ProducerState, Error> {
        self.ensure_running()?;

        self.send(Message::UpdateResponse(final_snapshot))?;
        self.send(Message::DoneNotification)?;
        self.finished = true;
        debug!("producer finished, waiting for release");

        self.await_release()
    }

    fn await_release(&mut self) -> Result<ProducerState, Error> {
        loop {
            match self.inbound_rx.recv() {
                Ok(Message::DoneAck) => {
                    trace!("producer received done_ack");
                    self.transition(ProducerState::Done);
                    return Ok(self.state);
                }
                Ok(Message::QuitRequest) => {
                    trace!("producer received quit_request");
                    self.quit_requested = true;
                    self.transition(ProducerState::Exiting);
                    return Ok(self.state);
                }
                // Stale update requests land here too
                Ok(other) => {
                    trace!("producer ignoring {} while finalizing", other.kind());
                }
                Err(_) => return Err(self.disconnect()),
            }
        }
    }

    /// Drive `computation` to completion or until the consumer asks us to quit.
    ///
    /// Control messages are serviced every `advance_per_poll` units of work.
    pub fn run<C>(&mut self, computation: &mut C, config: &Config) -> Result<ProducerState, Error>
    where
        C: Computation<Snapshot = S>,
    {
        let per_poll = config.advance_per_poll_clamped();
        loop {
            for _ in 0..per_poll {
                if computation.is_complete() {
                    return self.finalize(computation.snapshot());
                }
                computation.advance();
            }
            if self.poll_control(|| computation.snapshot())? == Control::Stop {
                return Ok(self.state);
            }
        }
    }

    fn ensure_running(&self) -> Result<(), Error> {
        if self.state.is_terminal() {
            return Err(Error::AlreadyTerminated);
        }
        Ok(())
    }

    fn send(&mut self, msg: Message<S>) -> Result<(), Error> {
        trace!("producer sending {}", msg.kind());
        if self.outbound_tx.send(msg).is_err() {
            return Err(self.disconnect());
        }
        Ok(())
    }

    fn transition(&mut self, next: ProducerState) {
        debug!("producer {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn disconnect(&mut self) -> Error {
        warn!("consumer disconnected while producer was {:?}", self.state);
        self.transition(ProducerState::Disconnected);
        Error::ConsumerDisconnected
    }
}

#[cfg(all(test, feature = "sync-std"))]
mod tests {
    use super::*;
    use crate::sync::std::{StdChannel, StdReceiver, StdSender};
    use crate::sync::traits::ChannelType;
    use std::thread;

    type TestProducer = Producer<u32, StdReceiver<Message<u32>>, StdSender<Message<u32>>>;

    fn harness() -> (StdSender<Message<u32>>, StdReceiver<Message<u32>>, TestProducer) {
        let (inbound_tx, inbound_rx) = StdChannel::create_inbound_channel();
        let (outbound_tx, outbound_rx) = StdChannel::create_outbound_channel();
        (inbound_tx, outbound_rx, Producer::new(inbound_rx, outbound_tx))
    }

    fn drain(rx: &StdReceiver<Message<u32>>) -> Vec<Message<u32>> {
        let mut out = Vec::new();
        while let Ok(Some(msg)) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Counts to a limit, one step per advance
    struct Counter {
        value: u32,
        limit: u32,
    }

    impl Computation for Counter {
        type Snapshot = u32;

        fn advance(&mut self) {
            self.value += 1;
        }

        fn snapshot(&self) -> u32 {
            self.value
        }

        fn is_complete(&self) -> bool {
            self.value >= self.limit
        }
    }

    #[test]
    fn test_answers_update_request() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::UpdateRequest).unwrap();

        assert_eq!(producer.poll_control(|| 7).unwrap(), Control::Continue);
        assert_eq!(drain(&rx), vec![Message::UpdateResponse(7)]);
        assert_eq!(producer.state(), ProducerState::Running);
    }

    #[test]
    fn test_coalesces_redundant_requests() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::UpdateRequest).unwrap();
        tx.send(Message::UpdateRequest).unwrap();
        tx.send(Message::UpdateRequest).unwrap();

        let mut calls = 0;
        producer
            .poll_control(|| {
                calls += 1;
                calls
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(drain(&rx), vec![Message::UpdateResponse(1)]);

        // Answered flag resets on the next poll
        tx.send(Message::UpdateRequest).unwrap();
        producer.poll_control(|| 2).unwrap();
        assert_eq!(drain(&rx), vec![Message::UpdateResponse(2)]);
    }

    #[test]
    fn test_quit_request_stops_and_skips_rest() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::QuitRequest).unwrap();
        tx.send(Message::UpdateRequest).unwrap();

        assert_eq!(producer.poll_control(|| 0).unwrap(), Control::Stop);
        assert_eq!(producer.state(), ProducerState::Exiting);
        assert!(producer.quit_requested());
        assert_eq!(drain(&rx), vec![Message::QuitResponse]);

        assert_eq!(producer.poll_control(|| 0), Err(Error::AlreadyTerminated));
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_push_update_alongside_request() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::UpdateRequest).unwrap();

        producer.push_update(1).unwrap();
        producer.poll_control(|| 2).unwrap();
        assert_eq!(
            drain(&rx),
            vec![Message::UpdateResponse(1), Message::UpdateResponse(2)]
        );
    }

    #[test]
    fn test_push_update_after_exit_sends_nothing() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::QuitRequest).unwrap();
        producer.poll_control(|| 0).unwrap();
        assert_eq!(drain(&rx), vec![Message::QuitResponse]);

        assert_eq!(producer.push_update(5), Err(Error::AlreadyTerminated));
        assert_eq!(producer.state(), ProducerState::Exiting);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_push_update_after_done_sends_nothing() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::DoneAck).unwrap();
        assert_eq!(producer.finalize(3).unwrap(), ProducerState::Done);
        drain(&rx);

        assert_eq!(producer.push_update(4), Err(Error::AlreadyTerminated));
        assert_eq!(producer.state(), ProducerState::Done);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_ignores_unexpected_messages() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::Other(99)).unwrap();
        tx.send(Message::DoneAck).unwrap();
        tx.send(Message::UpdateResponse(3)).unwrap();

        assert_eq!(producer.poll_control(|| 0).unwrap(), Control::Continue);
        assert!(drain(&rx).is_empty());
        assert_eq!(producer.state(), ProducerState::Running);
    }

    #[test]
    fn test_finalize_released_by_done_ack() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::UpdateRequest).unwrap();
        tx.send(Message::DoneAck).unwrap();

        assert_eq!(producer.finalize(42).unwrap(), ProducerState::Done);
        assert!(producer.finished());
        assert_eq!(
            drain(&rx),
            vec![Message::UpdateResponse(42), Message::DoneNotification]
        );
    }

    #[test]
    fn test_finalize_released_by_quit_without_response() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::QuitRequest).unwrap();

        assert_eq!(producer.finalize(5).unwrap(), ProducerState::Exiting);
        assert_eq!(
            drain(&rx),
            vec![Message::UpdateResponse(5), Message::DoneNotification]
        );
    }

    #[test]
    fn test_finalize_blocks_until_release() {
        let (tx, rx, mut producer) = harness();

        let handle = thread::spawn(move || producer.finalize(1));

        assert_eq!(rx.recv().unwrap(), Message::UpdateResponse(1));
        assert_eq!(rx.recv().unwrap(), Message::DoneNotification);
        tx.send(Message::Other(1)).unwrap();
        tx.send(Message::DoneAck).unwrap();

        assert_eq!(handle.join().unwrap().unwrap(), ProducerState::Done);
    }

    #[test]
    fn test_consumer_disconnect_while_running() {
        let (tx, _rx, mut producer) = harness();
        drop(tx);

        assert_eq!(producer.poll_control(|| 0), Err(Error::ConsumerDisconnected));
        assert_eq!(producer.state(), ProducerState::Disconnected);
    }

    #[test]
    fn test_consumer_disconnect_while_finalizing() {
        let (tx, rx, mut producer) = harness();
        drop(tx);

        assert_eq!(producer.finalize(0), Err(Error::ConsumerDisconnected));
        assert_eq!(producer.state(), ProducerState::Disconnected);
        drop(rx);
    }

    #[test]
    fn test_run_completes_and_finalizes() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::DoneAck).unwrap();

        // Completes before the first poll, so the queued ack releases finalize
        let mut counter = Counter { value: 0, limit: 2 };
        let config = Config::default().with_advance_per_poll(3);
        assert_eq!(producer.run(&mut counter, &config).unwrap(), ProducerState::Done);
        assert_eq!(
            drain(&rx),
            vec![Message::UpdateResponse(2), Message::DoneNotification]
        );
    }

    #[test]
    fn test_run_stops_on_quit() {
        let (tx, rx, mut producer) = harness();
        tx.send(Message::UpdateRequest).unwrap();
        tx.send(Message::QuitRequest).unwrap();

        let mut counter = Counter { value: 0, limit: u32::MAX };
        let config = Config::default().with_advance_per_poll(4);
        assert_eq!(producer.run(&mut counter, &config).unwrap(), ProducerState::Exiting);
        assert_eq!(counter.value, 4);
        assert_eq!(
            drain(&rx),
            vec![Message::UpdateResponse(4), Message::QuitResponse]
        );
    }
}
