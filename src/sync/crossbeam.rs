use crate::sync::traits::{ChannelError, ChannelReceiver, ChannelSender, ChannelType};
use crate::types::Message;
use crossbeam_channel::TryRecvError;

pub type CrossbeamConsumer<S> =
    crate::Consumer<S, CrossbeamSender<Message<S>>, CrossbeamReceiver<Message<S>>>;
pub type CrossbeamProducer<S> =
    crate::Producer<S, CrossbeamReceiver<Message<S>>, CrossbeamSender<Message<S>>>;

/// Sender type for the crossbeam backend
pub struct CrossbeamSender<T>(crossbeam_channel::Sender<T>);
/// Receiver type for the crossbeam backend
pub struct CrossbeamReceiver<T>(crossbeam_channel::Receiver<T>);

impl<T> ChannelSender<T> for CrossbeamSender<T> {
    fn send(&self, msg: T) -> Result<(), ChannelError> {
        self.0.send(msg).map_err(|_| ChannelError::Disconnected)
    }
}

impl<T> ChannelReceiver<T> for CrossbeamReceiver<T> {
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

/// Channel type for the crossbeam backend
pub struct CrossbeamChannel;

impl ChannelType for CrossbeamChannel {
    type Sender<T> = CrossbeamSender<T>;
    type Receiver<T> = CrossbeamReceiver<T>;

    fn create_inbound_channel<S>() -> (Self::Sender<Message<S>>, Self::Receiver<Message<S>>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (CrossbeamSender(tx), CrossbeamReceiver(rx))
    }

    fn create_outbound_channel<S>() -> (Self::Sender<Message<S>>, Self::Receiver<Message<S>>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (CrossbeamSender(tx), CrossbeamReceiver(rx))
    }
}

pub struct CrossbeamTug<S> {
    _phantom: std::marker::PhantomData<S>,
}

impl<S> CrossbeamTug<S> {
    /// Create a connected consumer/producer pair
    pub fn pair() -> (CrossbeamConsumer<S>, CrossbeamProducer<S>) {
        let (inbound_tx, inbound_rx) = CrossbeamChannel::create_inbound_channel();
        let (outbound_tx, outbound_rx) = CrossbeamChannel::create_outbound_channel();

        (
            crate::Consumer::new(inbound_tx, outbound_rx),
            crate::Producer::new(inbound_rx, outbound_tx),
        )
    }
}
