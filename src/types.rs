/// Messages exchanged between consumer and producer.
///
/// Each variant travels in exactly one direction; see the variant docs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<S> {
    /// Consumer to producer: stop now.
    QuitRequest,
    /// Producer to consumer: acknowledged, exiting.
    QuitResponse,
    /// Consumer to producer: send current progress.
    UpdateRequest,
    /// Producer to consumer: a snapshot of current output.
    UpdateResponse(S),
    /// Producer to consumer: computation finished, the last snapshot sent is final.
    DoneNotification,
    /// Consumer to producer: final result received, you may exit.
    DoneAck,
    /// Out-of-protocol traffic. Always ignored by the receiver.
    Other(u32),
}

impl<S> Message<S> {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::QuitRequest => "quit_request",
            Message::QuitResponse => "quit_response",
            Message::UpdateRequest => "update_request",
            Message::UpdateResponse(_) => "update_response",
            Message::DoneNotification => "done_notification",
            Message::DoneAck => "done_ack",
            Message::Other(_) => "other",
        }
    }
}

/// Lifecycle of the producer side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    Running,
    /// Left after a quit request. Terminal.
    Exiting,
    /// Left after the done acknowledgement. Terminal.
    Done,
    /// The consumer vanished mid-handshake. Terminal.
    Disconnected,
}

impl ProducerState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProducerState::Running)
    }
}

/// Lifecycle of the consumer side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Active,
    /// Quit request sent, waiting for the producer to confirm.
    AwaitingQuitAck,
    Closed,
    /// The producer vanished mid-handshake. Terminal.
    Disconnected,
}

impl ConsumerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ConsumerState::Closed | ConsumerState::Disconnected)
    }
}

/// Verdict of a producer control poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// A quit request was seen; the computation must stop immediately.
    Stop,
}

/// Verdict of a consumer timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule the next tick.
    Continue,
    /// The consumer is terminal; do not reschedule.
    Terminate,
}

/// Why the consumer reached a terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    /// The producer answered a quit request.
    QuitAcknowledged,
    /// Quit was requested while the producer was finishing; its done
    /// notification closed the exchange.
    FinishedDuringQuit,
    /// Quit was requested after the producer had already finished.
    QuitAfterDone,
    /// The producer went away without completing the handshake.
    Disconnected,
}
