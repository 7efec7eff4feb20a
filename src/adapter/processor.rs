//! Default output processor - the host's generic assembly normalization.
//!
//! Handles the line-level filters (`commentOnly`, `directives`, `labels`,
//! `trim`). Anything that needs symbol knowledge (demangling, library code,
//! debug calls) is left to richer processors and ignored here.

use std::collections::HashSet;

use anyhow::Result;

use crate::adapter::capabilities::{Filter, FilterSet};
use crate::adapter::trait_def::{CompileResult, OutputProcessor};

/// Line-based normalization for GNU-style assembly text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOutputProcessor;

impl DefaultOutputProcessor {
    /// Create the processor.
    pub fn new() -> Self {
        DefaultOutputProcessor
    }
}

fn is_comment_only(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// Name defined by a label line (`name:` at column 0), if any.
fn label_definition(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let head = line.split_whitespace().next()?;
    let name = head.strip_suffix(':')?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn is_directive(line: &str) -> bool {
    line.trim_start().starts_with('.') && label_definition(line).is_none()
}

fn symbol_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.' || c == '$'))
        .filter(|t| !t.is_empty())
}

fn squash_whitespace(line: &str) -> String {
    let indent = if line.starts_with(char::is_whitespace) {
        "  "
    } else {
        ""
    };
    let body = line.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{indent}{body}")
}

impl OutputProcessor for DefaultOutputProcessor {
    fn process(
        &self,
        mut result: CompileResult,
        filters: &FilterSet,
        _options: &[String],
    ) -> Result<CompileResult> {
        for filter in filters.enabled() {
            if matches!(
                filter,
                Filter::Demangle | Filter::LibraryCode | Filter::DebugCalls
            ) {
                tracing::debug!("default processor does not implement '{}', skipping", filter);
            }
        }

        let line_filtering =
            filters.comment_only || filters.directives || filters.labels || filters.trim;

        let referenced: HashSet<&str> = if filters.labels {
            result
                .asm
                .lines()
                .filter(|line| label_definition(line).is_none())
                .flat_map(symbol_tokens)
                .collect()
        } else {
            HashSet::new()
        };

        let mut lines = Vec::new();
        for line in result.asm.lines() {
            if line_filtering && line.trim().is_empty() {
                continue;
            }
            if filters.comment_only && is_comment_only(line) {
                continue;
            }
            if filters.directives && is_directive(line) {
                continue;
            }
            if filters.labels {
                if let Some(name) = label_definition(line) {
                    if !referenced.contains(name) {
                        continue;
                    }
                }
            }

            if filters.trim {
                lines.push(squash_whitespace(line));
            } else {
                lines.push(line.to_string());
            }
        }

        result.lines = lines;
        result.filters = *filters;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SAMPLE_ASM, SAMPLE_IR};

    fn process(asm: &str, filters: FilterSet) -> Vec<String> {
        let raw = CompileResult {
            asm: asm.to_string(),
            ..Default::default()
        };
        DefaultOutputProcessor::new()
            .process(raw, &filters, &[])
            .unwrap()
            .lines
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let lines = process(SAMPLE_ASM, FilterSet::NONE);
        assert_eq!(lines.len(), SAMPLE_ASM.lines().count());
        assert!(lines.iter().any(|l| l.is_empty()));
    }

    #[test]
    fn test_comment_only() {
        let lines = process(SAMPLE_ASM, FilterSet::from_filters([Filter::CommentOnly]));
        assert!(!lines.iter().any(|l| l == "# compiler banner"));
        // trailing comments stay
        assert!(lines.iter().any(|l| l.contains("# save frame")));
        assert!(!lines.iter().any(|l| l.is_empty()));
    }

    #[test]
    fn test_directives() {
        let lines = process(SAMPLE_ASM, FilterSet::from_filters([Filter::Directives]));
        assert!(!lines.iter().any(|l| l.contains(".globl")));
        assert!(!lines.iter().any(|l| l.contains(".text")));
        assert!(lines.contains(&".LFB0:".to_string()));
        assert!(lines.contains(&"main:".to_string()));
    }

    #[test]
    fn test_labels() {
        let lines = process(SAMPLE_ASM, FilterSet::from_filters([Filter::Labels]));
        assert!(!lines.contains(&".LFB0:".to_string()));
        assert!(lines.contains(&".L2:".to_string()));
        assert!(lines.contains(&"main:".to_string()));
    }

    #[test]
    fn test_trim() {
        let lines = process(SAMPLE_ASM, FilterSet::from_filters([Filter::Trim]));
        assert!(lines.contains(&"  movl $42, %eax".to_string()));
        assert!(lines.contains(&"main:".to_string()));
    }

    #[test]
    fn test_records_applied_filters() {
        let filters = FilterSet::from_filters([Filter::Trim, Filter::Demangle]);
        let raw = CompileResult::default();
        let processed = DefaultOutputProcessor::new()
            .process(raw, &filters, &[])
            .unwrap();
        assert_eq!(processed.filters, filters);
    }

    #[test]
    fn test_ir_untouched_without_filters() {
        let lines = process(SAMPLE_IR, FilterSet::NONE);
        let expected: Vec<String> = SAMPLE_IR.lines().map(str::to_string).collect();
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_comment_filter_drops_ir_header() {
        let lines = process(SAMPLE_IR, FilterSet::from_filters([Filter::CommentOnly]));
        assert!(!lines.iter().any(|l| l.starts_with("; ModuleID")));
    }
}
