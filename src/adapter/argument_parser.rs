//! Compiler argument parsers.
//!
//! A parser introspects a compiler's `--help` output so the host can offer
//! option completion. Backends pick one via `CompilerBackend::argument_parser`.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use crate::util::process::ProcessBuilder;

/// Which parser the host should use for a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentParserKind {
    /// Minimal parser: one `--help` pass, no backend-specific introspection
    Base,
    /// GCC-style parser: common, optimizer and target help pages
    #[default]
    Gcc,
}

/// An option discovered in help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOption {
    /// Option as spelled on the command line (e.g. `--output`)
    pub name: String,

    /// One-line description
    pub description: String,
}

impl ArgumentParserKind {
    /// Get the parser name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentParserKind::Base => "base",
            ArgumentParserKind::Gcc => "gcc",
        }
    }

    /// Help invocations to run, one argument list per pass.
    pub fn help_args(&self) -> Vec<Vec<&'static str>> {
        match self {
            ArgumentParserKind::Base => vec![vec!["--help"]],
            ArgumentParserKind::Gcc => vec![
                vec!["--help=common"],
                vec!["--help=optimizers"],
                vec!["--target-help"],
            ],
        }
    }

    /// Run the compiler's help passes and collect every option found.
    pub fn collect_options(&self, exe: &Path) -> Result<Vec<CompilerOption>> {
        let mut options = Vec::new();
        for args in self.help_args() {
            let output = ProcessBuilder::new(exe).args(&args).exec()?;
            let text = output.stdout.join("\n");
            tracing::debug!(
                "{} parser: {} {} produced {} bytes",
                self.as_str(),
                exe.display(),
                args.join(" "),
                text.len()
            );
            for option in parse_options(&text) {
                if !options.iter().any(|o: &CompilerOption| o.name == option.name) {
                    options.push(option);
                }
            }
        }
        Ok(options)
    }
}

impl std::fmt::Display for ArgumentParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn option_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s+(-{1,2}[\w+-]+)(?:[= ]?<?[\w.-]+>?)?(?:,\s*-{1,2}[\w+-]+(?:[= ]?<?[\w.-]+>?)?)*\s{2,}(\S.*)$")
            .expect("option regex is valid")
    })
}

/// Extract `  -flag[=VALUE]   description` lines from help text.
///
/// Lines without a description column are skipped.
pub fn parse_options(help: &str) -> Vec<CompilerOption> {
    help.lines()
        .filter_map(|line| {
            let caps = option_line().captures(line)?;
            Some(CompilerOption {
                name: caps[1].to_string(),
                description: caps[2].trim().to_string(),
            })
        })
        .collect()
}
