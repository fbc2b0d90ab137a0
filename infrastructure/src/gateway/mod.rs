//! Model gateway adapters.

mod anthropic;

pub use anthropic::AnthropicGateway;
