//! Infrastructure layer: concrete adapters behind the application ports.
//!
//! Everything that talks to the outside world lives here: the model gateway,
//! the audio backends, the console chat transport, the in-memory stores and
//! the configuration loader. None of this leaks back into the domain or
//! application layers except through the port traits.

pub mod audio;
pub mod config;
pub mod directory;
pub mod events;
pub mod gateway;
pub mod logging;
pub mod transport;

pub use audio::{AuddRecognizer, FfmpegMerger, GoogleSpeechSynthesizer};
pub use config::{ConfigLoader, FileConfig};
pub use directory::InMemoryUserDirectory;
pub use events::InMemoryEventStore;
pub use gateway::AnthropicGateway;
pub use logging::JsonlExchangeLogger;
pub use transport::ConsoleTransport;
