use crate::sync::traits::{ChannelError, ChannelReceiver, ChannelSender, ChannelType};
use crate::types::Message;
use std::sync::mpsc::{self, TryRecvError};

pub type StdConsumer<S> = crate::Consumer<S, StdSender<Message<S>>, StdReceiver<Message<S>>>;
pub type StdProducer<S> = crate::Producer<S, StdReceiver<Message<S>>, StdSender<Message<S>>>;

/// Sender type for the std backend
pub struct StdSender<T>(mpsc::Sender<T>);
/// Receiver type for the std backend
pub struct StdReceiver<T>(mpsc::Receiver<T>);

impl<T> ChannelSender<T> for StdSender<T> {
    fn send(&self, msg: T) -> Result<(), ChannelError> {
        self.0.send(msg).map_err(|_| ChannelError::Disconnected)
    }
}

impl<T> ChannelReceiver<T> for StdReceiver<T> {
    fn recv(&self) -> Result<T, ChannelError> {
        self.0.recv().map_err(|_| ChannelError::Disconnected)
    }

    fn try_recv(&self) -> Result<Option<T>, ChannelError> {
        match self.0.try_recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::Disconnected),
        }
    }
}

/// Channel type for the std backend
pub struct StdChannel;

impl ChannelType for StdChannel {
    type Sender<T> = StdSender<T>;
    type Receiver<T> = StdReceiver<T>;

    fn create_inbound_channel<S>() -> (Self::Sender<Message<S>>, Self::Receiver<Message<S>>) {
        let (tx, rx) = mpsc::channel();
        (StdSender(tx), StdReceiver(rx))
    }

    fn create_outbound_channel<S>() -> (Self::Sender<Message<S>>, Self::Receiver<Message<S>>) {
        let (tx, rx) = mpsc::channel();
        (StdSender(tx), StdReceiver(rx))
    }
}

pub struct StdTug<S> {
    _phantom: std::marker::PhantomData<S>,
}

impl<S> StdTug<S> {
    /// Create a connected consumer/producer pair
    pub fn pair() -> (StdConsumer<S>, StdProducer<S>) {
        let (inbound_tx, inbound_rx) = StdChannel::create_inbound_channel();
        let (outbound_tx, outbound_rx) = StdChannel::create_outbound_channel();

        (
            crate::Consumer::new(inbound_tx, outbound_rx),
            crate::Producer::new(inbound_rx, outbound_tx),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConsumerState, Control, ProducerState, TerminalReason, Tick};
    use crate::view::LogView;
    use crate::Error;
    use std::thread;

    #[test]
    fn test_update_round_trip() {
        let (mut consumer, mut producer) = StdTug::<i32>::pair();
        let mut view = LogView::default();

        consumer.on_timer_tick(&mut view).unwrap();
        assert!(consumer.pending_request());

        assert_eq!(producer.poll_control(|| 42).unwrap(), Control::Continue);

        consumer.drain_outbound(&mut view).unwrap();
        assert!(!consumer.pending_request());
        assert_eq!(consumer.last_snapshot().map(|s| **s), Some(42));
        assert_eq!(view.snapshots(), 1);
    }

    #[test]
    fn test_unsolicited_update_clears_pending_request() {
        let (mut consumer, mut producer) = StdTug::<i32>::pair();
        let mut view = LogView::default();

        consumer.on_timer_tick(&mut view).unwrap();
        assert!(consumer.pending_request());

        // Pushed while the request is still queued, then the request is answered
        producer.push_update(1).unwrap();
        assert_eq!(producer.poll_control(|| 2).unwrap(), Control::Continue);

        assert_eq!(consumer.drain_outbound(&mut view).unwrap(), Tick::Continue);
        assert!(!consumer.pending_request());
        assert_eq!(view.snapshots(), 2);
        assert_eq!(consumer.last_snapshot().map(|s| **s), Some(2));

        // A single fresh request follows on the next tick
        consumer.on_timer_tick(&mut view).unwrap();
        assert!(consumer.pending_request());
        producer.poll_control(|| 3).unwrap();
        consumer.drain_outbound(&mut view).unwrap();
        assert_eq!(view.snapshots(), 3);
        assert_eq!(consumer.last_snapshot().map(|s| **s), Some(3));
    }

    #[test]
    fn test_quit_mid_computation() {
        let (mut consumer, mut producer) = StdTug::<i32>::pair();
        let mut view = LogView::default();

        consumer.request_quit(&mut view).unwrap();
        assert_eq!(consumer.state(), ConsumerState::AwaitingQuitAck);

        assert_eq!(producer.poll_control(|| 0).unwrap(), Control::Stop);
        assert_eq!(producer.state(), ProducerState::Exiting);

        assert_eq!(consumer.on_timer_tick(&mut view).unwrap(), Tick::Terminate);
        assert_eq!(consumer.state(), ConsumerState::Closed);
        assert_eq!(view.terminal(), Some(TerminalReason::QuitAcknowledged));
    }

    #[test]
    fn test_completion_acknowledged() {
        let (mut consumer, mut producer) = StdTug::<i32>::pair();
        let mut view = LogView::default();

        let producer_handle = thread::spawn(move || producer.finalize(7));

        while !consumer.producer_done() {
            consumer.on_timer_tick(&mut view).unwrap();
            thread::yield_now();
        }

        assert_eq!(producer_handle.join().unwrap(), Ok(ProducerState::Done));
        assert_eq!(consumer.state(), ConsumerState::Active);
        assert_eq!(consumer.last_snapshot().map(|s| **s), Some(7));

        // Producer channel is gone now, which is fine after the ack
        assert_eq!(consumer.on_timer_tick(&mut view).unwrap(), Tick::Continue);
    }

    #[test]
    fn test_quit_races_completion() {
        let (mut consumer, mut producer) = StdTug::<i32>::pair();
        let mut view = LogView::default();

        // Quit is queued before the producer finishes
        consumer.request_quit(&mut view).unwrap();
        assert_eq!(producer.finalize(3).unwrap(), ProducerState::Exiting);

        assert_eq!(consumer.on_timer_tick(&mut view).unwrap(), Tick::Terminate);
        assert_eq!(view.terminal(), Some(TerminalReason::FinishedDuringQuit));
        assert_eq!(consumer.last_snapshot().map(|s| **s), Some(3));
    }

    #[test]
    fn test_producer_disconnection_error() {
        let (mut consumer, producer) = StdTug::<i32>::pair();
        let mut view = LogView::default();

        // Simulate crash
        let producer_handle = thread::spawn(move || {
            let _producer = producer;
            panic!("Producer crashed!");
        });
        let _ = producer_handle.join();

        let result = consumer.on_timer_tick(&mut view);
        assert!(matches!(result, Err(Error::ProducerDisconnected)));
        assert_eq!(consumer.state(), ConsumerState::Disconnected);
    }

    #[test]
    fn test_consumer_disconnection_error() {
        let (consumer, mut producer) = StdTug::<i32>::pair();
        drop(consumer);

        let result = producer.poll_control(|| 0);
        assert!(matches!(result, Err(Error::ConsumerDisconnected)));
        assert_eq!(producer.state(), ProducerState::Disconnected);
    }
}
