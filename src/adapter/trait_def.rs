//! Adapter traits and the data they exchange with the host.
//!
//! `CompilerBackend` and `Tool` carry default implementations of the host
//! pipeline; concrete adapters override only what differs. The host-owned
//! primitives they delegate to are `OutputProcessor` and `ToolRunner`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::adapter::argument_parser::ArgumentParserKind;
use crate::adapter::capabilities::{AdapterCapabilities, FilterSet};
use crate::util::process::{find_executable, ProcessBuilder};

/// Backend availability status.
#[derive(Debug, Clone)]
pub enum BackendAvailability {
    /// Executable found and reported a version
    Available {
        /// Detected version
        version: semver::Version,
    },

    /// Executable found, but its version output was not understood
    UnknownVersion,

    /// Executable not found
    NotInstalled {
        /// Executable that was searched for
        exe: PathBuf,
    },
}

impl BackendAvailability {
    /// Check if the backend can be invoked.
    pub fn is_available(&self) -> bool {
        !matches!(self, BackendAvailability::NotInstalled { .. })
    }

    /// Get error message if not available.
    pub fn error_message(&self) -> Option<String> {
        match self {
            BackendAvailability::NotInstalled { exe } => {
                Some(format!("{} not found in PATH", exe.display()))
            }
            _ => None,
        }
    }
}

fn version_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("version regex is valid"))
}

/// Pull the first `major.minor[.patch]` out of `--version` output.
pub fn parse_version(text: &str) -> Option<semver::Version> {
    let caps = version_token().captures(text)?;
    let major = caps[1].parse().ok()?;
    let minor = caps[2].parse().ok()?;
    let patch = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    Some(semver::Version::new(major, minor, patch))
}

/// Probe an executable with `--version`.
pub fn probe_executable(exe: &Path) -> Result<BackendAvailability> {
    let Some(resolved) = find_executable(&exe.to_string_lossy()) else {
        return Ok(BackendAvailability::NotInstalled {
            exe: exe.to_path_buf(),
        });
    };

    let output = ProcessBuilder::new(&resolved).arg("--version").exec()?;

    Ok(match parse_version(&output.combined_text()) {
        Some(version) => BackendAvailability::Available { version },
        None => BackendAvailability::UnknownVersion,
    })
}

/// Opaque backend-specific options, from the `[compiler.backend]` config table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendOptions {
    /// Options table (backend-specific keys)
    pub options: toml::Table,
}

impl BackendOptions {
    /// Create empty backend options.
    pub fn new() -> Self {
        BackendOptions {
            options: toml::Table::new(),
        }
    }

    /// Create backend options from a TOML table.
    pub fn from_table(table: toml::Table) -> Self {
        BackendOptions { options: table }
    }

    /// Check if no options are set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// A compile request as the host receives it.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    /// Source file to compile
    pub source: PathBuf,

    /// User-supplied compiler flags
    pub user_options: Vec<String>,

    /// Requested output transformations
    pub filters: FilterSet,

    /// Backend-specific options
    pub backend_options: BackendOptions,
}

impl CompileRequest {
    /// Create a request for a source file.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        CompileRequest {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Set requested filters.
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Set user flags.
    pub fn with_user_options(mut self, options: Vec<String>) -> Self {
        self.user_options = options;
        self
    }

    /// Set backend-specific options.
    pub fn with_backend_options(mut self, options: BackendOptions) -> Self {
        self.backend_options = options;
        self
    }
}

/// Where a backend should write its output.
///
/// The host picks the directory; the backend picks the file name.
#[derive(Debug, Clone)]
pub struct OutputLocator {
    /// Working directory
    pub dir: PathBuf,

    /// Logical base name
    pub base: String,
}

impl OutputLocator {
    /// Create a locator.
    pub fn new(dir: impl Into<PathBuf>, base: impl Into<String>) -> Self {
        OutputLocator {
            dir: dir.into(),
            base: base.into(),
        }
    }

    /// Let a backend name the output file.
    pub fn resolve(&self, backend: &dyn CompilerBackend) -> PathBuf {
        backend.output_filename(&self.dir, &self.base)
    }
}

/// Output of one compilation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    /// Compiler exit code (-1 if killed by a signal)
    pub code: i32,

    /// Compiler stdout, one entry per line
    pub stdout: Vec<String>,

    /// Compiler stderr, one entry per line
    pub stderr: Vec<String>,

    /// Raw output file contents
    pub asm: String,

    /// Output after normalization
    pub lines: Vec<String>,

    /// File the backend wrote
    pub output_filename: PathBuf,

    /// Language tag for the output (e.g. `llvm`)
    pub language_id: Option<String>,

    /// Filters normalization actually applied
    pub filters: FilterSet,
}

impl CompileResult {
    /// Check if the compiler succeeded.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Upstream compilation metadata handed to a tool.
#[derive(Debug, Clone)]
pub struct CompilationInfo {
    /// Backend key that produced the output
    pub compiler: String,

    /// File the backend declared as its output
    pub output_filename: PathBuf,

    /// Filters the compilation was requested with
    pub filters: FilterSet,
}

impl CompilationInfo {
    /// Create compilation metadata.
    pub fn new(
        compiler: impl Into<String>,
        output_filename: impl Into<PathBuf>,
        filters: FilterSet,
    ) -> Self {
        CompilationInfo {
            compiler: compiler.into(),
            output_filename: output_filename.into(),
            filters,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool identifier
    pub id: String,

    /// Display name
    pub name: Option<String>,

    /// Executable to run
    pub exe: PathBuf,

    /// Arguments placed before the caller's
    pub default_args: Vec<String>,
}

impl ToolInfo {
    /// Create tool metadata without a display name.
    pub fn new(id: impl Into<String>, exe: impl Into<PathBuf>) -> Self {
        ToolInfo {
            id: id.into(),
            name: None,
            exe: exe.into(),
            default_args: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set default arguments.
    pub fn with_default_args(mut self, args: Vec<String>) -> Self {
        self.default_args = args;
        self
    }
}

/// Output of one tool run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Tool identifier
    pub id: String,

    /// Tool display name
    pub name: Option<String>,

    /// Exit code (-1 for a failure reported before running)
    pub code: i32,

    /// Tool stdout, one entry per line
    pub stdout: Vec<String>,

    /// Tool stderr, one entry per line
    pub stderr: Vec<String>,

    /// Language tag for the output
    pub language_id: Option<String>,
}

impl ToolResult {
    /// Structured failure the host can render like any other tool result.
    pub fn error_response(tool: &ToolInfo, message: impl Into<String>) -> Self {
        ToolResult {
            id: tool.id.clone(),
            name: tool.name.clone(),
            code: -1,
            stdout: Vec::new(),
            stderr: vec![message.into()],
            language_id: Some("stderr".to_string()),
        }
    }

    /// Check if the tool succeeded.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Errors from a tool run.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The upstream artifact is binary; the tool needs textual IR
    #[error("{tool} requires a text file with LLVM IR")]
    InputNotText {
        /// Display name of the refusing tool
        tool: String,
    },

    /// Failure from the delegated run primitive, unchanged
    #[error(transparent)]
    Delegated(#[from] anyhow::Error),
}

impl ToolError {
    /// Turn the error into what the host renders.
    ///
    /// Precondition failures become a structured error response; delegated
    /// failures are handed back unchanged.
    pub fn into_response(self, tool: &ToolInfo) -> Result<ToolResult> {
        match self {
            ToolError::InputNotText { .. } => Ok(ToolResult::error_response(tool, self.to_string())),
            ToolError::Delegated(inner) => Err(inner),
        }
    }
}

/// Generic result-normalization primitive owned by the host.
pub trait OutputProcessor: Send + Sync {
    /// Apply `filters` to a raw compile result.
    fn process(
        &self,
        result: CompileResult,
        filters: &FilterSet,
        options: &[String],
    ) -> Result<CompileResult>;
}

/// Generic tool-run primitive owned by the host.
pub trait ToolRunner: Send + Sync {
    /// Run `tool` against `input` with `args`.
    fn run(
        &self,
        tool: &ToolInfo,
        compilation: &CompilationInfo,
        input: Option<&Path>,
        args: &[String],
    ) -> Result<ToolResult>;
}

/// A compiler backend as seen by the host pipeline.
///
/// Every method has the host's default behavior; adapters override what
/// their compiler does differently.
pub trait CompilerBackend: Send + Sync {
    /// Registry key.
    fn key(&self) -> &'static str;

    /// Compiler executable.
    fn exe(&self) -> &Path;

    /// Human-readable description.
    fn description(&self) -> &str {
        self.key()
    }

    /// Filters this backend can honor.
    fn capabilities(&self) -> &AdapterCapabilities {
        &AdapterCapabilities::ALL_DISABLED
    }

    /// Language tag for the output, if the backend overrides the host's guess.
    fn result_language_id(&self, _filters: Option<&FilterSet>) -> Option<&'static str> {
        None
    }

    /// File the compiler will write for this directory and base name.
    fn output_filename(&self, dir: &Path, base: &str) -> PathBuf {
        dir.join(format!("{base}.s"))
    }

    /// Flags that direct the compiler to `output`.
    fn options_for_backend(&self, _opts: &BackendOptions, _output: &Path) -> Vec<String> {
        Vec::new()
    }

    /// Parser used to introspect the compiler's CLI.
    fn argument_parser(&self) -> ArgumentParserKind {
        ArgumentParserKind::Gcc
    }

    /// Flags derived from the requested filters.
    fn options_for_filter(
        &self,
        filters: &FilterSet,
        output: &Path,
        _user_options: &[String],
    ) -> Vec<String> {
        let mut options = vec![
            "-S".to_string(),
            "-o".to_string(),
            output.display().to_string(),
        ];
        if filters.intel {
            options.push("-masm=intel".to_string());
        }
        options
    }

    /// Normalize a raw result through the host's processor.
    fn process_output(
        &self,
        result: CompileResult,
        filters: &FilterSet,
        options: &[String],
        processor: &dyn OutputProcessor,
    ) -> Result<CompileResult> {
        processor.process(result, filters, options)
    }

    /// Check if the compiler can be invoked.
    ///
    /// This runs `<exe> --version` and should be called lazily.
    fn availability(&self) -> Result<BackendAvailability> {
        probe_executable(self.exe())
    }
}

/// An auxiliary tool run against a compilation's output.
pub trait Tool: Send + Sync {
    /// Registry key.
    fn key(&self) -> &'static str;

    /// Tool metadata.
    fn info(&self) -> &ToolInfo;

    /// Run the tool through the host's runner.
    fn run_tool(
        &self,
        compilation: &CompilationInfo,
        input: Option<&Path>,
        args: &[String],
        runner: &dyn ToolRunner,
    ) -> Result<ToolResult, ToolError> {
        Ok(runner.run(self.info(), compilation, input, args)?)
    }
}
