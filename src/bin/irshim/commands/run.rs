//! `irshim run` command
//!
//! Run a tool against the output of an earlier compilation.

use anyhow::Result;

use crate::cli::RunArgs;
use irshim::adapter::{AdapterRegistry, CompilationInfo, FilterSet, ProcessToolRunner, Tool};
use irshim::Config;

pub fn execute(args: RunArgs, config: &Config) -> Result<()> {
    let registry = AdapterRegistry::from_config(config);
    let tool = registry.tool(&args.tool)?;

    let compilation = CompilationInfo::new(
        args.compiler,
        args.output_file,
        FilterSet::from_filters(args.filters),
    );

    let runner = ProcessToolRunner::new();
    let result = match tool.run_tool(&compilation, args.input.as_deref(), &args.args, &runner) {
        Ok(result) => result,
        Err(err) => err.into_response(tool.info())?,
    };

    for line in &result.stdout {
        println!("{}", line);
    }
    for line in &result.stderr {
        eprintln!("{}", line);
    }

    if !result.success() {
        let name = result.name.as_deref().unwrap_or(&result.id);
        anyhow::bail!("{} exited with code {}", name, result.code);
    }

    Ok(())
}
