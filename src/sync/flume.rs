use crate::sync::traits::{ChannelError, ChannelReceiver, ChannelSender, ChannelType};
use crate::types::Message;
use flume::TryRecvError;

pub type FlumeConsumer<S> =
    crate::Consumer<S, FlumeSender<Message<S>>, FlumeReceiver<Message<S>>>;
pub type FlumeProducer<S> =
    crate::Producer<S, FlumeReceiver<Message<S>>, FlumeSender<Message<S>>>;

/// Sender type for the flume backend
pub struct FlumeSender<T>(flume::Sender<T>);
/// Receiver type for the flume backend
pub struct FlumeReceiver<T>(flume::Receiver<T>);

impl<T> ChannelSender<T> for FlumeSender<T> {
    fn send(&self, msg: T) -> Result<(), ChannelError> {
        self.0.send(msg).map_err(|_| ChannelError::Disconnected)
    }
}

impl<T> ChannelReceiver<T> for FlumeReceiver<T> {
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

/// Channel type for the flume backend
pub struct FlumeChannel;

impl ChannelType for FlumeChannel {
    type Sender<T> = FlumeSender<T>;
    type Receiver<T> = FlumeReceiver<T>;

    fn create_inbound_channel<S>() -> (Self::Sender<Message<S>>, Self::Receiver<Message<S>>) {
        let (tx, rx) = flume::unbounded();
        (FlumeSender(tx), FlumeReceiver(rx))
    }

    fn create_outbound_channel<S>() -> (Self::Sender<Message<S>>, Self::Receiver<Message<S>>) {
        let (tx, rx) = flume::unbounded();
        (FlumeSender(tx), FlumeReceiver(rx))
    }
}

pub struct FlumeTug<S> {
    _phantom: std::marker::PhantomData<S>,
}

impl<S> FlumeTug<S> {
    /// Create a connected consumer/producer pair
    pub fn pair() -> (FlumeConsumer<S>, FlumeProducer<S>) {
        let (inbound_tx, inbound_rx) = FlumeChannel::create_inbound_channel();
        let (outbound_tx, outbound_rx) = FlumeChannel::create_outbound_channel();

        (
            crate::Consumer::new(inbound_tx, outbound_rx),
            crate::Producer::new(inbound_rx, outbound_tx),
        )
    }
}
