pub use crate::error::Error as ChannelError;

use crate::types::Message;

/// Sending half of a one-directional channel. Never blocks.
pub trait ChannelSender<T> {
    fn send(&self, msg: T) -> Result<(), ChannelError>;
}

/// Receiving half of a one-directional channel.
pub trait ChannelReceiver<T> {
    /// Blocks until a message arrives.
    fn recv(&self) -> Result<T, ChannelError>;

    /// Returns `Ok(None)` when the channel is empty but the sender is alive.
    fn try_recv(&self) -> Result<Option<T>, ChannelError>;
}

pub trait ChannelType {
    type Sender<T>: ChannelSender<T>;
    type Receiver<T>: ChannelReceiver<T>;

    /// Consumer to producer.
    fn create_inbound_channel<S>() -> (
        Self::Sender<Message<S>>,
        Self::Receiver<Message<S>>,
    );

    /// Producer to consumer.
    fn create_outbound_channel<S>() -> (
        Self::Sender<Message<S>>,
        Self::Receiver<Message<S>>,
    );
}
