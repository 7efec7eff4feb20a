//! `irshim compile` command
//!
//! Compile one source file through a backend and print the normalized output.

use anyhow::{Context, Result};

use crate::cli::CompileArgs;
use irshim::adapter::{
    AdapterRegistry, BackendOptions, CompileDriver, CompileRequest, CompilerBackend,
    DefaultOutputProcessor, FilterSet,
};
use irshim::Config;

pub fn execute(args: CompileArgs, config: &Config) -> Result<()> {
    let registry = AdapterRegistry::from_config(config);
    let backend = registry.backend(&args.backend)?;

    let source = std::fs::canonicalize(&args.source)
        .with_context(|| format!("source file not found: {}", args.source.display()))?;

    // Temp dir must outlive the compile when no workdir is given.
    let tmp;
    let workdir = match args.workdir {
        Some(dir) => dir,
        None => {
            tmp = tempfile::Builder::new().prefix("irshim-").tempdir()?;
            tmp.path().to_path_buf()
        }
    };

    let mut user_options = config.compiler.options.clone();
    user_options.extend(args.user_options);

    let request = CompileRequest::new(source)
        .with_filters(FilterSet::from_filters(args.filters))
        .with_user_options(user_options)
        .with_backend_options(BackendOptions::from_table(config.compiler.backend.clone()));

    let processor = DefaultOutputProcessor::new();
    let driver = CompileDriver::new(backend, &processor, &workdir);
    let result = driver.compile(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in &result.stderr {
            eprintln!("{}", line);
        }
        for line in &result.lines {
            println!("{}", line);
        }
    }

    if !result.success() {
        anyhow::bail!("{} exited with code {}", backend.key(), result.code);
    }

    Ok(())
}
