//! Application layer for cadenza
//!
//! This crate contains the exchange orchestration loop, the tool dispatcher,
//! the fixed tool catalog, and the port definitions for every external
//! capability. It depends only on the domain layer; adapters live in the
//! infrastructure crate.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod exchange;
pub mod ports;
pub mod side_channel;

// Re-export commonly used types
pub use catalog::assistant_catalog;
pub use config::ExchangeConfig;
pub use dispatch::ToolDispatcher;
pub use exchange::{ExchangeError, ExchangeRunner, InboundMessage};
pub use ports::{
    audio::{AudioError, AudioMerger, SongRecognizer, SpeechSynthesizer},
    chat_transport::{ChatTransport, TransportError},
    event_store::{EventStore, EventStoreError},
    exchange_logger::{ExchangeEvent, ExchangeLogger, NoExchangeLogger},
    model_gateway::{GatewayError, ModelGateway},
    user_directory::{DirectoryError, UserDirectory},
};
pub use side_channel::AttachmentStore;
