//! Structured logging adapters.

mod jsonl;

pub use jsonl::JsonlExchangeLogger;
