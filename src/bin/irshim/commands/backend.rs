//! `irshim backend` command
//!
//! List and show compiler backends.

use std::path::Path;

use anyhow::Result;

use crate::cli::{BackendArgs, BackendCommands};
use irshim::adapter::{
    AdapterRegistry, BackendAvailability, BackendOptions, CompilerBackend, Tool,
};
use irshim::Config;

pub fn execute(args: BackendArgs, config: &Config) -> Result<()> {
    let registry = AdapterRegistry::from_config(config);
    match args.command {
        BackendCommands::List => list_backends(&registry),
        BackendCommands::Show(show_args) => show_backend(&registry, &show_args.backend),
        BackendCommands::Options(opts_args) => list_options(&registry, &opts_args.backend),
    }
}

fn list_backends(registry: &AdapterRegistry) -> Result<()> {
    println!("Compiler Backends:");
    println!();

    for (key, availability) in registry.check_all() {
        let backend = registry.backend(key)?;
        let status = match availability {
            Ok(BackendAvailability::Available { version }) => format!("available ({})", version),
            Ok(avail) if avail.is_available() => "available".to_string(),
            Ok(avail) => format!(
                "not installed ({})",
                avail.error_message().unwrap_or_default()
            ),
            Err(e) => format!("error ({:#})", e),
        };

        println!("  {} - {}", key, backend.description());
        println!("    Compiler:   {}", backend.exe().display());
        println!("    Status:     {}", status);
        println!();
    }

    println!("Tools:");
    println!();
    for key in registry.tool_keys() {
        let info = registry.tool(key)?.info();
        println!(
            "  {} - {} ({})",
            key,
            info.name.as_deref().unwrap_or(&info.id),
            info.exe.display()
        );
    }

    Ok(())
}

fn show_backend(registry: &AdapterRegistry, key: &str) -> Result<()> {
    let backend = registry.backend(key)?;
    let caps = backend.capabilities();
    let example_dir = Path::new("<workdir>");
    let output = backend.output_filename(example_dir, "<base>");

    println!("Backend: {}", backend.key());
    println!();

    println!("Invocation:");
    println!("  Compiler:        {}", backend.exe().display());
    println!(
        "  Language:        {}",
        backend.result_language_id(None).unwrap_or("(host default)")
    );
    println!("  Output file:     {}", output.display());
    println!(
        "  Backend flags:   {}",
        backend
            .options_for_backend(&BackendOptions::new(), &output)
            .join(" ")
    );
    println!("  Argument parser: {}", backend.argument_parser());
    println!();

    let disabled = caps.disabled_filters();
    println!("Unsupported filters:");
    if disabled.is_empty() {
        println!("  (none)");
    }
    for filter in disabled {
        println!("  {}", filter);
    }

    Ok(())
}

fn list_options(registry: &AdapterRegistry, key: &str) -> Result<()> {
    let backend = registry.backend(key)?;
    let parser = backend.argument_parser();
    let options = parser.collect_options(backend.exe())?;

    if options.is_empty() {
        println!("{} advertises no options ({} parser)", backend.exe().display(), parser);
        return Ok(());
    }

    let width = options.iter().map(|o| o.name.len()).max().unwrap_or(0);
    for option in options {
        println!("  {:<width$}  {}", option.name, option.description, width = width);
    }

    Ok(())
}
