//! Chat transport adapters.

mod console;

pub use console::ConsoleTransport;
