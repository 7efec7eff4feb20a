//! Filter and capability types.
//!
//! A [`FilterSet`] is what a caller asks for; [`AdapterCapabilities`] is what
//! a backend can honestly do. Capabilities are immutable facts about a
//! backend, not configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single optional output transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    /// Compile to a binary and disassemble it
    Binary,
    /// Compile to a binary object file
    BinaryObject,
    /// Execute the produced program
    Execute,
    /// Demangle symbol names
    Demangle,
    /// Render assembly in Intel syntax
    Intel,
    /// Drop unused labels
    Labels,
    /// Drop code pulled in from libraries
    LibraryCode,
    /// Drop assembler directives
    Directives,
    /// Drop comment-only lines
    CommentOnly,
    /// Collapse horizontal whitespace
    Trim,
    /// Drop calls into debug helpers
    DebugCalls,
    /// Collect optimization remarks
    OptOutput,
    /// Keep real file names in the output
    DontMaskFilenames,
}

impl Filter {
    /// Every filter, in declaration order.
    pub const ALL: [Filter; 13] = [
        Filter::Binary,
        Filter::BinaryObject,
        Filter::Execute,
        Filter::Demangle,
        Filter::Intel,
        Filter::Labels,
        Filter::LibraryCode,
        Filter::Directives,
        Filter::CommentOnly,
        Filter::Trim,
        Filter::DebugCalls,
        Filter::OptOutput,
        Filter::DontMaskFilenames,
    ];

    /// Get the filter name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::Binary => "binary",
            Filter::BinaryObject => "binaryObject",
            Filter::Execute => "execute",
            Filter::Demangle => "demangle",
            Filter::Intel => "intel",
            Filter::Labels => "labels",
            Filter::LibraryCode => "libraryCode",
            Filter::Directives => "directives",
            Filter::CommentOnly => "commentOnly",
            Filter::Trim => "trim",
            Filter::DebugCalls => "debugCalls",
            Filter::OptOutput => "optOutput",
            Filter::DontMaskFilenames => "dontMaskFilenames",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Filter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .iter()
            .copied()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| FilterParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown filter name.
#[derive(Debug, Clone, Error)]
#[error("invalid filter '{0}', valid values: binary, binaryObject, execute, demangle, intel, labels, libraryCode, directives, commentOnly, trim, debugCalls, optOutput, dontMaskFilenames")]
pub struct FilterParseError(pub String);

/// The set of output transformations a caller requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSet {
    /// `binary` requested
    pub binary: bool,
    /// `binaryObject` requested
    pub binary_object: bool,
    /// `execute` requested
    pub execute: bool,
    /// `demangle` requested
    pub demangle: bool,
    /// `intel` requested
    pub intel: bool,
    /// `labels` requested
    pub labels: bool,
    /// `libraryCode` requested
    pub library_code: bool,
    /// `directives` requested
    pub directives: bool,
    /// `commentOnly` requested
    pub comment_only: bool,
    /// `trim` requested
    pub trim: bool,
    /// `debugCalls` requested
    pub debug_calls: bool,
    /// `optOutput` requested
    pub opt_output: bool,
    /// `dontMaskFilenames` requested
    pub dont_mask_filenames: bool,
}

impl FilterSet {
    /// No transformation requested.
    pub const NONE: FilterSet = FilterSet {
        binary: false,
        binary_object: false,
        execute: false,
        demangle: false,
        intel: false,
        labels: false,
        library_code: false,
        directives: false,
        comment_only: false,
        trim: false,
        debug_calls: false,
        opt_output: false,
        dont_mask_filenames: false,
    };

    /// Build a set from a list of filters.
    pub fn from_filters<I>(filters: I) -> Self
    where
        I: IntoIterator<Item = Filter>,
    {
        let mut set = FilterSet::NONE;
        for filter in filters {
            set.set(filter, true);
        }
        set
    }

    /// Check whether a filter is requested.
    pub fn is_set(&self, filter: Filter) -> bool {
        match filter {
            Filter::Binary => self.binary,
            Filter::BinaryObject => self.binary_object,
            Filter::Execute => self.execute,
            Filter::Demangle => self.demangle,
            Filter::Intel => self.intel,
            Filter::Labels => self.labels,
            Filter::LibraryCode => self.library_code,
            Filter::Directives => self.directives,
            Filter::CommentOnly => self.comment_only,
            Filter::Trim => self.trim,
            Filter::DebugCalls => self.debug_calls,
            Filter::OptOutput => self.opt_output,
            Filter::DontMaskFilenames => self.dont_mask_filenames,
        }
    }

    /// Turn a filter on or off.
    pub fn set(&mut self, filter: Filter, value: bool) {
        let slot = match filter {
            Filter::Binary => &mut self.binary,
            Filter::BinaryObject => &mut self.binary_object,
            Filter::Execute => &mut self.execute,
            Filter::Demangle => &mut self.demangle,
            Filter::Intel => &mut self.intel,
            Filter::Labels => &mut self.labels,
            Filter::LibraryCode => &mut self.library_code,
            Filter::Directives => &mut self.directives,
            Filter::CommentOnly => &mut self.comment_only,
            Filter::Trim => &mut self.trim,
            Filter::DebugCalls => &mut self.debug_calls,
            Filter::OptOutput => &mut self.opt_output,
            Filter::DontMaskFilenames => &mut self.dont_mask_filenames,
        };
        *slot = value;
    }

    /// Iterate over the requested filters.
    pub fn enabled(&self) -> impl Iterator<Item = Filter> + '_ {
        Filter::ALL.iter().copied().filter(|f| self.is_set(*f))
    }

    /// Check if nothing is requested.
    pub fn is_empty(&self) -> bool {
        self.enabled().next().is_none()
    }

    /// Check if the upstream artifact is a binary of any kind.
    pub fn is_binary_artifact(&self) -> bool {
        self.binary || self.binary_object
    }
}

/// What a backend can honestly do with its output.
///
/// Every field defaults to unsupported. Declaring a capability the backend
/// cannot honor is a contract violation the host does not detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdapterCapabilities {
    /// Can produce and disassemble a binary
    pub binary: bool,

    /// Can execute the produced program
    pub execute: bool,

    /// Can demangle symbols
    pub demangle: bool,

    /// Can render Intel syntax
    pub intel: bool,

    /// Can extract and filter labels
    pub labels: bool,

    /// Can filter library code
    pub library_code: bool,

    /// Can filter directives
    pub directives: bool,

    /// Can strip comment-only lines
    pub comment_only: bool,

    /// Can trim output whitespace
    pub trim: bool,

    /// Can filter debug calls
    pub debug_calls: bool,
}

impl AdapterCapabilities {
    /// Nothing supported.
    pub const ALL_DISABLED: AdapterCapabilities = AdapterCapabilities {
        binary: false,
        execute: false,
        demangle: false,
        intel: false,
        labels: false,
        library_code: false,
        directives: false,
        comment_only: false,
        trim: false,
        debug_calls: false,
    };

    /// Check if a filter can be honored.
    ///
    /// `binaryObject` rides on `binary`; `optOutput` and `dontMaskFilenames`
    /// are not capability-gated.
    pub fn supports(&self, filter: Filter) -> bool {
        match filter {
            Filter::Binary | Filter::BinaryObject => self.binary,
            Filter::Execute => self.execute,
            Filter::Demangle => self.demangle,
            Filter::Intel => self.intel,
            Filter::Labels => self.labels,
            Filter::LibraryCode => self.library_code,
            Filter::Directives => self.directives,
            Filter::CommentOnly => self.comment_only,
            Filter::Trim => self.trim,
            Filter::DebugCalls => self.debug_calls,
            Filter::OptOutput | Filter::DontMaskFilenames => true,
        }
    }

    /// Filters this backend declares unsupported.
    pub fn disabled_filters(&self) -> Vec<Filter> {
        Filter::ALL
            .iter()
            .copied()
            .filter(|f| !matches!(f, Filter::BinaryObject))
            .filter(|f| !self.supports(*f))
            .collect()
    }
}
