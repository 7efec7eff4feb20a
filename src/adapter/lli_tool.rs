//! `lli-tool` - runs the LLVM interpreter over a compilation's IR output.

use std::path::{Path, PathBuf};

use crate::adapter::trait_def::{
    CompilationInfo, Tool, ToolError, ToolInfo, ToolResult, ToolRunner,
};

/// Label used in messages when the tool has no display name.
pub const DEFAULT_TOOL_LABEL: &str = "lli";

/// Interpreter tool for LLVM textual IR.
#[derive(Debug, Clone)]
pub struct LliTool {
    info: ToolInfo,
}

impl LliTool {
    /// Registry key.
    pub const KEY: &'static str = "lli-tool";

    /// Create the tool from its metadata.
    pub fn new(info: ToolInfo) -> Self {
        LliTool { info }
    }

    /// Create the tool for an interpreter executable, named `lli`.
    pub fn with_exe(exe: impl Into<PathBuf>) -> Self {
        Self::new(ToolInfo::new(Self::KEY, exe).with_name(DEFAULT_TOOL_LABEL))
    }

    fn label(&self) -> &str {
        self.info.name.as_deref().unwrap_or(DEFAULT_TOOL_LABEL)
    }
}

impl Default for LliTool {
    fn default() -> Self {
        Self::with_exe("lli")
    }
}

impl Tool for LliTool {
    fn key(&self) -> &'static str {
        Self::KEY
    }

    fn info(&self) -> &ToolInfo {
        &self.info
    }

    /// Refuses binary upstream output; otherwise runs on the file the
    /// compilation declared, whatever `_input` says.
    fn run_tool(
        &self,
        compilation: &CompilationInfo,
        _input: Option<&Path>,
        args: &[String],
        runner: &dyn ToolRunner,
    ) -> Result<ToolResult, ToolError> {
        if compilation.filters.is_binary_artifact() {
            tracing::debug!(
                "{}: upstream {} produced a binary artifact, not running",
                Self::KEY,
                compilation.compiler
            );
            return Err(ToolError::InputNotText {
                tool: self.label().to_string(),
            });
        }

        Ok(runner.run(
            &self.info,
            compilation,
            Some(compilation.output_filename.as_path()),
            args,
        )?)
    }
}
