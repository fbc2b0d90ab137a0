//! Port definitions
//!
//! Each port is a capability trait the application layer depends on.
//! Implementations (adapters) live in the infrastructure layer.

pub mod audio;
pub mod chat_transport;
pub mod event_store;
pub mod exchange_logger;
pub mod model_gateway;
pub mod user_directory;
