//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use irshim::adapter::Filter;

/// irshim - drive an LLVM-IR compiler and the lli interpreter
#[derive(Parser)]
#[command(name = "irshim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.irshim and .irshim
    #[arg(long, global = true, env = "IRSHIM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect compiler backends
    Backend(BackendArgs),

    /// Compile a source file through a backend
    Compile(CompileArgs),

    /// Run a tool against a compilation's output
    Run(RunArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BackendArgs {
    #[command(subcommand)]
    pub command: BackendCommands,
}

#[derive(Subcommand)]
pub enum BackendCommands {
    /// List registered backends and tools
    List,

    /// Show a backend's capabilities and invocation shape
    Show(BackendKeyArgs),

    /// List the options a backend's compiler advertises
    Options(BackendKeyArgs),
}

#[derive(Args)]
pub struct BackendKeyArgs {
    /// Backend key (e.g. compproj)
    pub backend: String,
}

#[derive(Args)]
pub struct CompileArgs {
    /// Source file
    pub source: PathBuf,

    /// Backend key
    #[arg(long, default_value = "compproj")]
    pub backend: String,

    /// Requested output filter (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<Filter>,

    /// Working directory for the compiler output
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Flags passed to the compiler
    #[arg(last = true)]
    pub user_options: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Tool key
    #[arg(default_value = "lli-tool")]
    pub tool: String,

    /// Output file the compilation produced
    #[arg(long)]
    pub output_file: PathBuf,

    /// Backend that produced the output
    #[arg(long, default_value = "compproj")]
    pub compiler: String,

    /// Filters the compilation was requested with (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<Filter>,

    /// Input path hint passed to the tool adapter
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Arguments passed to the tool
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
