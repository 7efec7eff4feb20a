//! Test utilities and spies for irshim unit tests.
//!
//! The spies stand in for the host-owned primitives (`OutputProcessor`,
//! `ToolRunner`) and record every call so tests can assert on what an
//! adapter delegated, or that it delegated nothing at all.
//!
//! # Example
//!
//! ```rust,ignore
//! use irshim::test_support::RecordingRunner;
//!
//! let runner = RecordingRunner::new();
//! tool.run_tool(&compilation, None, &[], &runner)?;
//! assert_eq!(runner.call_count(), 1);
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use crate::adapter::capabilities::FilterSet;
use crate::adapter::trait_def::{
    CompilationInfo, CompileResult, OutputProcessor, ToolInfo, ToolResult, ToolRunner,
};

/// Output processor that records the filters it was called with.
///
/// Returns the result unchanged apart from recording the applied filters.
#[derive(Debug, Clone, Default)]
pub struct RecordingProcessor {
    calls: Arc<Mutex<Vec<FilterSet>>>,
    options: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingProcessor {
    /// Create a new recording processor.
    pub fn new() -> Self {
        RecordingProcessor::default()
    }

    /// Filter sets passed to `process`, in call order.
    pub fn calls(&self) -> Vec<FilterSet> {
        self.calls.lock().unwrap().clone()
    }

    /// Options passed to `process`, in call order.
    pub fn options(&self) -> Vec<Vec<String>> {
        self.options.lock().unwrap().clone()
    }
}

impl OutputProcessor for RecordingProcessor {
    fn process(
        &self,
        mut result: CompileResult,
        filters: &FilterSet,
        options: &[String],
    ) -> Result<CompileResult> {
        self.calls.lock().unwrap().push(*filters);
        self.options.lock().unwrap().push(options.to_vec());
        result.filters = *filters;
        Ok(result)
    }
}

/// A single recorded runner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCall {
    /// Tool identifier
    pub tool: String,

    /// Upstream output the compilation declared
    pub compilation_output: PathBuf,

    /// Input path the tool was asked to read
    pub input: Option<PathBuf>,

    /// Arguments passed through
    pub args: Vec<String>,
}

/// Tool runner that records calls instead of spawning processes.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<RunnerCall>>>,
    failure: Option<String>,
}

impl RecordingRunner {
    /// Create a runner whose every call succeeds with exit code 0.
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Create a runner whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        RecordingRunner {
            calls: Arc::default(),
            failure: Some(message.into()),
        }
    }

    /// Recorded calls, in order.
    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(
        &self,
        tool: &ToolInfo,
        compilation: &CompilationInfo,
        input: Option<&Path>,
        args: &[String],
    ) -> Result<ToolResult> {
        self.calls.lock().unwrap().push(RunnerCall {
            tool: tool.id.clone(),
            compilation_output: compilation.output_filename.clone(),
            input: input.map(Path::to_path_buf),
            args: args.to_vec(),
        });

        if let Some(ref message) = self.failure {
            return Err(anyhow!("{}", message));
        }

        Ok(ToolResult {
            id: tool.id.clone(),
            name: tool.name.clone(),
            code: 0,
            ..Default::default()
        })
    }
}

/// Sample LLVM IR as a compiler in this family would emit it.
pub const SAMPLE_IR: &str = r#"; ModuleID = 'program'
source_filename = "program"

define i64 @main() {
entry:
  %0 = add i64 40, 2
  ret i64 %0
}
"#;

/// Sample GNU-style assembly with comments, directives and labels.
pub const SAMPLE_ASM: &str = "\
\t.text
\t.file\t\"example.c\"
# compiler banner
\t.globl\tmain
main:
.LFB0:
\tpushq   %rbp   # save frame
\tmovl\t$42,   %eax
\tjmp .L2
.L2:
\tpopq %rbp

\tret
";
