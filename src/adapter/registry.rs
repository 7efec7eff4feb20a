//! Adapter registry - lookup of backends and tools by key.
//!
//! Construction never fails and never runs anything. Availability is
//! checked lazily via `backend.availability()` when a backend is needed.

use std::collections::BTreeMap;

use anyhow::Result;
use thiserror::Error;

use crate::adapter::compproj::CompProjBackend;
use crate::adapter::lli_tool::LliTool;
use crate::adapter::trait_def::{BackendAvailability, CompilerBackend, Tool};
use crate::util::config::Config;

/// Error returned when a key names no registered adapter.
#[derive(Debug, Clone, Error)]
#[error("unknown {kind} '{key}', valid values: {}", .valid.join(", "))]
pub struct AdapterKeyError {
    /// "backend" or "tool"
    pub kind: &'static str,
    /// Requested key
    pub key: String,
    /// Registered keys
    pub valid: Vec<String>,
}

/// Registry of compiler backends and tools.
pub struct AdapterRegistry {
    backends: BTreeMap<&'static str, Box<dyn CompilerBackend>>,
    tools: BTreeMap<&'static str, Box<dyn Tool>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        AdapterRegistry {
            backends: BTreeMap::new(),
            tools: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in adapters using default executables.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Create a registry with the built-in adapters configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::empty();
        registry.register_backend(Box::new(CompProjBackend::new(config.compiler_exe())));
        registry.register_tool(Box::new(LliTool::new(config.tool_info(LliTool::KEY))));
        registry
    }

    /// Register a backend. An existing backend with the same key is replaced.
    pub fn register_backend(&mut self, backend: Box<dyn CompilerBackend>) {
        self.backends.insert(backend.key(), backend);
    }

    /// Register a tool. An existing tool with the same key is replaced.
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.key(), tool);
    }

    /// Get a backend by key.
    pub fn backend(&self, key: &str) -> Result<&dyn CompilerBackend, AdapterKeyError> {
        self.backends
            .get(key)
            .map(|b| b.as_ref())
            .ok_or_else(|| AdapterKeyError {
                kind: "backend",
                key: key.to_string(),
                valid: self.backend_keys().map(str::to_string).collect(),
            })
    }

    /// Get a tool by key.
    pub fn tool(&self, key: &str) -> Result<&dyn Tool, AdapterKeyError> {
        self.tools
            .get(key)
            .map(|t| t.as_ref())
            .ok_or_else(|| AdapterKeyError {
                kind: "tool",
                key: key.to_string(),
                valid: self.tool_keys().map(str::to_string).collect(),
            })
    }

    /// Registered backend keys, sorted.
    pub fn backend_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.backends.keys().copied()
    }

    /// Registered tool keys, sorted.
    pub fn tool_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    /// Check availability of every backend.
    ///
    /// This runs each compiler with `--version` and may be slow.
    pub fn check_all(&self) -> Vec<(&'static str, Result<BackendAvailability>)> {
        self.backends
            .iter()
            .map(|(key, backend)| (*key, backend.availability()))
            .collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
