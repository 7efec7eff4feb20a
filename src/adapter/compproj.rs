//! `compproj` backend - a compiler that emits LLVM textual IR.
//!
//! The compiler always writes `out.ll` into its working directory and has no
//! filter toggles. Nothing in the host's assembly post-processing understands
//! IR, so every capability is declared unsupported and normalization runs with
//! all filters off.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::adapter::argument_parser::ArgumentParserKind;
use crate::adapter::capabilities::{AdapterCapabilities, FilterSet};
use crate::adapter::trait_def::{BackendOptions, CompileResult, CompilerBackend, OutputProcessor};

/// Name of the file the compiler writes.
pub const OUTPUT_FILENAME: &str = "out.ll";

/// Language tag for LLVM IR output.
pub const LLVM_IR_LANGUAGE: &str = "llvm";

/// Backend for the IR-emitting compiler.
#[derive(Debug, Clone)]
pub struct CompProjBackend {
    exe: PathBuf,
}

impl CompProjBackend {
    /// Registry key.
    pub const KEY: &'static str = "compproj";

    /// Create the backend for a compiler executable.
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        CompProjBackend { exe: exe.into() }
    }
}

impl Default for CompProjBackend {
    fn default() -> Self {
        Self::new("compiler")
    }
}

impl CompilerBackend for CompProjBackend {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn exe(&self) -> &Path {
        &self.exe
    }

    fn description(&self) -> &str {
        "Compiler emitting LLVM textual IR"
    }

    fn capabilities(&self) -> &AdapterCapabilities {
        &AdapterCapabilities::ALL_DISABLED
    }

    fn result_language_id(&self, _filters: Option<&FilterSet>) -> Option<&'static str> {
        Some(LLVM_IR_LANGUAGE)
    }

    fn output_filename(&self, dir: &Path, _base: &str) -> PathBuf {
        dir.join(OUTPUT_FILENAME)
    }

    fn options_for_backend(&self, _opts: &BackendOptions, output: &Path) -> Vec<String> {
        vec!["--output".to_string(), output.display().to_string()]
    }

    fn argument_parser(&self) -> ArgumentParserKind {
        ArgumentParserKind::Base
    }

    fn options_for_filter(
        &self,
        _filters: &FilterSet,
        _output: &Path,
        _user_options: &[String],
    ) -> Vec<String> {
        Vec::new()
    }

    fn process_output(
        &self,
        result: CompileResult,
        filters: &FilterSet,
        options: &[String],
        processor: &dyn OutputProcessor,
    ) -> Result<CompileResult> {
        if !filters.is_empty() {
            tracing::debug!(
                "{}: ignoring requested filters {:?}, IR is passed through unfiltered",
                Self::KEY,
                filters.enabled().map(|f| f.as_str()).collect::<Vec<_>>()
            );
        }
        processor.process(result, &FilterSet::NONE, options)
    }
}
