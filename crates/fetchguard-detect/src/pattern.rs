//! Compiled expected patterns.

use crate::error::{DetectError, Result};
use fetchguard_core::ExpectedPattern;
use regex::{Regex, RegexBuilder};

/// An [`ExpectedPattern`] with its regular expression compiled.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    name: String,
    regex: Regex,
    min_count: usize,
}

impl CompiledPattern {
    /// Compile a pattern case-insensitively.
    pub fn compile(expected: &ExpectedPattern) -> Result<Self> {
        let regex = RegexBuilder::new(&expected.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| DetectError::InvalidPattern {
                name: expected.name.clone(),
                source,
            })?;

        Ok(Self {
            name: expected.name.clone(),
            regex,
            min_count: expected.min_count,
        })
    }

    /// Compile every pattern, skipping entries with an empty expression.
    pub fn compile_all(expected: &[ExpectedPattern]) -> Result<Vec<Self>> {
        expected
            .iter()
            .filter(|expected| {
                let keep = !expected.pattern.is_empty();
                if !keep {
                    tracing::debug!(name = %expected.name, "skipping expected pattern with empty expression");
                }
                keep
            })
            .map(Self::compile)
            .collect()
    }

    /// Label used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum number of matches required.
    #[must_use]
    pub fn min_count(&self) -> usize {
        self.min_count
    }

    /// Matched values in document order.
    ///
    /// When the expression has a capture group, the value is group 1
    /// (empty if that group did not participate); otherwise the whole match.
    pub fn values<'h>(&self, haystack: &'h str) -> Vec<&'h str> {
        if self.regex.captures_len() > 1 {
            self.regex
                .captures_iter(haystack)
                .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
                .collect()
        } else {
            self.regex
                .find_iter(haystack)
                .map(|m| m.as_str())
                .collect()
        }
    }
}
