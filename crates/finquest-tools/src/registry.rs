//! Tool registry for managing available capabilities

use crate::{ArgumentAdapter, Tool, ToolDescriptor};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A registered capability: the tool plus its optional argument adapter
#[derive(Clone)]
pub struct RegistryEntry {
    /// The capability itself
    pub tool: Arc<dyn Tool>,
    /// Optional argument adapter applied before invocation
    pub adapter: Option<Arc<dyn ArgumentAdapter>>,
}

/// Registry for managing tools
///
/// Constructed explicitly at session setup and handed to the dispatcher;
/// there is no ambient global lookup.
pub struct ToolRegistry {
    entries: RwLock<HashMap<String, RegistryEntry>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool with identity argument handling
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            tool.name().to_string(),
            RegistryEntry {
                tool,
                adapter: None,
            },
        );
    }

    /// Register a tool together with an argument adapter
    pub fn register_with_adapter(&self, tool: Arc<dyn Tool>, adapter: Arc<dyn ArgumentAdapter>) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            tool.name().to_string(),
            RegistryEntry {
                tool,
                adapter: Some(adapter),
            },
        );
    }

    /// Get a registered entry by tool name
    pub fn get(&self, name: &str) -> Option<RegistryEntry> {
        let entries = self.entries.read().unwrap();
        entries.get(name).cloned()
    }

    /// Build descriptors for every registered tool, sorted by name
    ///
    /// Useful for rendering the tool catalog into the system prompt.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let entries = self.entries.read().unwrap();
        let mut descriptors: Vec<_> = entries.values().map(|e| e.tool.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap();
        entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        let entries = self.entries.read().unwrap();
        entries.is_empty()
    }
}
