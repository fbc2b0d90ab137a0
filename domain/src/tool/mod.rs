//! Tool domain module: catalog, invocations and outcomes.
//!
//! The model capability is handed the declarations from [`ToolCatalog`],
//! responds with a [`ToolInvocation`] when it wants a tool executed, and the
//! dispatcher answers with a [`ToolOutcome`] serialized onto the wire.

pub mod entities;
pub mod outcome;

pub use entities::{ToolCatalog, ToolDefinition, ToolInvocation, ToolParameter};
pub use outcome::ToolOutcome;
