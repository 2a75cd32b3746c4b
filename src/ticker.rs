//! Fixed-interval driver for the consumer side.

use std::thread;
use std::time::Duration;

use log::debug;

use crate::config::Config;
use crate::consumer::Consumer;
use crate::error::Error;
use crate::sync::traits::{ChannelReceiver, ChannelSender};
use crate::types::{ConsumerState, Message, Tick};
use crate::view::View;

/// Calls [`Consumer::on_timer_tick`] every `poll_interval` on the current
/// thread until the consumer reaches a terminal state.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
}

impl Ticker {
    pub fn new(config: &Config) -> Self {
        Self {
            interval: config.poll_interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run ticks until the consumer is closed.
    ///
    /// `should_quit` is consulted before every tick until it first returns
    /// `true`, at which point the consumer requests quit.
    pub fn run<S, ST, SR, V, Q>(
        &self,
        consumer: &mut Consumer<S, ST, SR>,
        view: &mut V,
        mut should_quit: Q,
    ) -> Result<ConsumerState, Error>
    where
        ST: ChannelSender<Message<S>>,
        SR: ChannelReceiver<Message<S>>,
        V: View<S>,
        Q: FnMut(&Consumer<S, ST, SR>) -> bool,
    {
        let mut ticks: u64 = 0;
        loop {
            if !consumer.quit_flag()
                && should_quit(consumer)
                && consumer.request_quit(view)? == Tick::Terminate
            {
                break;
            }

            ticks += 1;
            if consumer.on_timer_tick(view)? == Tick::Terminate {
                break;
            }
            thread::sleep(self.interval);
        }
        debug!("ticker stopped after {ticks} ticks in {:?}", consumer.state());
        Ok(consumer.state())
    }
}
