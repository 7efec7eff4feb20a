//! irshim - adapters for an LLVM-IR compiler and interpreter
//!
//! This crate provides the adapter contract a compiler-invocation host uses
//! to drive an IR-emitting compiler and the `lli` interpreter, plus a small
//! reference host (registry, process runner, output processor, compile
//! driver) that exercises it.

pub mod adapter;
pub mod util;

/// Spies for the host-owned primitives, used by unit tests.
#[cfg(test)]
pub mod test_support;

pub use adapter::{
    AdapterCapabilities, AdapterRegistry, CompProjBackend, CompilerBackend, FilterSet, LliTool,
    Tool, ToolError,
};
pub use util::Config;
