//! Process-backed tool runner.

use std::path::Path;

use anyhow::{Context, Result};

use crate::adapter::trait_def::{CompilationInfo, ToolInfo, ToolResult, ToolRunner};
use crate::util::process::ProcessBuilder;

/// Runs tools as child processes.
///
/// Command line: `<exe> <default args> <args> <input>`. The input is passed
/// as an absolute path and the working directory is its parent, so relative
/// paths the tool writes land next to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolRunner;

impl ProcessToolRunner {
    /// Create the runner.
    pub fn new() -> Self {
        ProcessToolRunner
    }

    fn command(tool: &ToolInfo, input: Option<&Path>, args: &[String]) -> Result<ProcessBuilder> {
        let mut pb = ProcessBuilder::new(&tool.exe)
            .args(&tool.default_args)
            .args(args);
        if let Some(input) = input {
            let input = std::path::absolute(input)
                .with_context(|| format!("failed to resolve {}", input.display()))?;
            if let Some(parent) = input.parent() {
                pb = pb.cwd(parent);
            }
            pb = pb.arg(&input);
        }
        Ok(pb)
    }
}

impl ToolRunner for ProcessToolRunner {
    fn run(
        &self,
        tool: &ToolInfo,
        compilation: &CompilationInfo,
        input: Option<&Path>,
        args: &[String],
    ) -> Result<ToolResult> {
        let pb = Self::command(tool, input, args)?;
        tracing::debug!(
            "running {} for {}: {}",
            tool.id,
            compilation.compiler,
            pb.display_command()
        );

        let output = pb.exec()?;

        Ok(ToolResult {
            id: tool.id.clone(),
            name: tool.name.clone(),
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
            language_id: None,
        })
    }
}
