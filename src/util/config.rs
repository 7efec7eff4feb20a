//! Configuration file support for irshim.
//!
//! Two locations are read:
//! - Global: `~/.irshim/config.toml` - user-wide defaults
//! - Project: `.irshim/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapter::lli_tool::DEFAULT_TOOL_LABEL;
use crate::adapter::trait_def::ToolInfo;

/// Default compiler executable name.
pub const DEFAULT_COMPILER: &str = "compiler";

/// irshim configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compiler backend settings
    pub compiler: CompilerConfig,

    /// Interpreter tool settings
    pub tool: ToolConfig,
}

/// Compiler backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Path to the compiler executable
    pub exe: Option<PathBuf>,

    /// Flags passed on every compile, before user flags
    pub options: Vec<String>,

    /// Backend-specific options (`[compiler.backend]`)
    pub backend: toml::Table,
}

/// Interpreter tool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Path to the interpreter executable
    pub exe: Option<PathBuf>,

    /// Display name used in messages
    pub name: Option<String>,

    /// Arguments passed before the caller's
    pub args: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.compiler.exe.is_some() {
            self.compiler.exe = other.compiler.exe;
        }
        if !other.compiler.options.is_empty() {
            self.compiler.options = other.compiler.options;
        }
        for (key, value) in other.compiler.backend {
            self.compiler.backend.insert(key, value);
        }

        if other.tool.exe.is_some() {
            self.tool.exe = other.tool.exe;
        }
        if other.tool.name.is_some() {
            self.tool.name = other.tool.name;
        }
        if !other.tool.args.is_empty() {
            self.tool.args = other.tool.args;
        }
    }

    /// Compiler executable, falling back to `compiler` on PATH.
    pub fn compiler_exe(&self) -> PathBuf {
        self.compiler
            .exe
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPILER))
    }

    /// Tool metadata for `id`.
    ///
    /// Without a configured name the tool is called `lli`.
    pub fn tool_info(&self, id: &str) -> ToolInfo {
        let exe = self
            .tool
            .exe
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOL_LABEL));
        let name = self
            .tool
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_TOOL_LABEL.to_string());

        ToolInfo::new(id, exe)
            .with_name(name)
            .with_default_args(self.tool.args.clone())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.irshim/config.toml)
/// 2. Global config (~/.irshim/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global irshim config directory (~/.irshim).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".irshim"))
}

/// Get the global config path (~/.irshim/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.irshim/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".irshim").join("config.toml")
}
