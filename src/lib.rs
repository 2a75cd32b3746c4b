#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "cli")]
pub mod chaos;
pub mod computation;
pub mod config;
pub mod consumer;
pub mod error;
pub mod latest;
pub mod producer;
pub mod ticker;
pub mod view;

pub mod sync;
pub mod types;

pub use computation::Computation;
pub use config::Config;
pub use consumer::Consumer;
pub use error::Error;
pub use latest::Latest;
pub use producer::Producer;
pub use ticker::Ticker;
pub use types::{ConsumerState, Control, Message, ProducerState, TerminalReason, Tick};
pub use view::{LogView, NullView, View};
