//! Compiler backend and tool adapters.
//!
//! A host pipeline drives compilers and auxiliary tools through two traits.
//! Each adapter declares what it can honestly do and how its executable is
//! invoked; the host owns process execution and output normalization.
//!
//! ```text
//!        CompileRequest
//!              │
//!              ▼
//!     ┌─────────────────┐  capabilities / output_filename /
//!     │ CompilerBackend │  options_for_backend / options_for_filter
//!     └────────┬────────┘
//!              │ process_output(result, filters)
//!              ▼
//!     ┌─────────────────┐
//!     │ OutputProcessor │  (host)
//!     └────────┬────────┘
//!              │ CompilationInfo
//!              ▼
//!     ┌─────────────────┐      ┌────────────┐
//!     │      Tool       │ ───▶ │ ToolRunner │  (host)
//!     └─────────────────┘      └────────────┘
//! ```
//!
//! # Key Concepts
//!
//! - **Filters / capabilities** - what callers ask for vs. what a backend
//!   supports (in `capabilities.rs`)
//! - **CompilerBackend / Tool** - adapter traits with host defaults
//!   (in `trait_def.rs`)
//! - **CompProjBackend** - LLVM-IR compiler adapter (in `compproj.rs`)
//! - **LliTool** - LLVM interpreter adapter (in `lli_tool.rs`)
//! - **Registry** - key lookup (in `registry.rs`)
//! - **Reference host** - `DefaultOutputProcessor`, `ProcessToolRunner`,
//!   `CompileDriver`

pub mod argument_parser;
pub mod capabilities;
pub mod compproj;
pub mod driver;
pub mod lli_tool;
pub mod processor;
pub mod registry;
pub mod runner;
pub mod trait_def;

pub use argument_parser::{parse_options, ArgumentParserKind, CompilerOption};

pub use capabilities::{AdapterCapabilities, Filter, FilterParseError, FilterSet};

pub use trait_def::{
    BackendAvailability, BackendOptions, CompilationInfo, CompileRequest, CompileResult,
    CompilerBackend, OutputLocator, OutputProcessor, Tool, ToolError, ToolInfo, ToolResult,
    ToolRunner,
};

pub use compproj::CompProjBackend;
pub use driver::CompileDriver;
pub use lli_tool::LliTool;
pub use processor::DefaultOutputProcessor;
pub use registry::{AdapterKeyError, AdapterRegistry};
pub use runner::ProcessToolRunner;
