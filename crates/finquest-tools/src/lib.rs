//! Tool framework for finquest
//!
//! Capabilities are registered by name in a [`ToolRegistry`], optionally
//! paired with an [`ArgumentAdapter`] that reshapes arguments before
//! invocation. The [`Dispatcher`] resolves, adapts, executes, and
//! normalizes every outcome into an [`Observation`] - errors included.

pub mod adapter;
pub mod dispatcher;
pub mod registry;
pub mod tool;

pub use adapter::{ArgumentAdapter, FirstTickerAdapter};
pub use dispatcher::{DispatchError, Dispatcher, Observation};
pub use registry::{RegistryEntry, ToolRegistry};
pub use tool::{Tool, ToolDescriptor};
