//! Compiled rule matchers with defensive regex limits
//!
//! This module compiles rule patterns into executable form. Explicit rules
//! match case-sensitively (author markup delimiters are exact); automatic
//! rules match case-insensitively (content sniffing should fire regardless
//! of capitalization).

use crate::constants::{MAX_REGEX_LENGTH, REGEX_DFA_SIZE_LIMIT, REGEX_SIZE_LIMIT};
use crate::{FormattingRule, Result, RuleError, RuleList};
use regex::{Regex, RegexBuilder};

/// Compile a regex with size limits to prevent ReDoS attacks
///
/// Adds defensive limits to regex compilation:
/// - Pattern length limit (500 chars)
/// - Compiled regex size limit (10MB)
/// - DFA size limit (2MB)
pub fn compile_regex_safe(pattern: &str, case_insensitive: bool) -> Result<Regex> {
    if pattern.len() > MAX_REGEX_LENGTH {
        return Err(RuleError::InvalidPattern(format!(
            "Pattern exceeds maximum length of {} characters",
            MAX_REGEX_LENGTH
        )));
    }

    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| RuleError::InvalidPattern(e.to_string()))
}

/// A rule compiled and ready for execution
#[derive(Debug)]
pub struct CompiledRule {
    /// Rule name (for logging and error reports)
    pub name: String,
    regex: Regex,
    list: RuleList,
}

/// Standalone match report for the rule tester
///
/// Produced without applying any effect or wrapper, so a rule can be
/// validated while it is being authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    /// Number of non-overlapping matches in the sample
    pub match_count: usize,
    /// The matched substrings, in order of appearance
    pub matches: Vec<String>,
}

impl CompiledRule {
    /// Compile a rule for the given list
    ///
    /// Explicit rules must define at least one capturing group; the group's
    /// content is what survives a replacement.
    pub fn compile(rule: &FormattingRule, list: RuleList) -> Result<Self> {
        let regex = compile_regex_safe(&rule.pattern, list == RuleList::Automatic)?;

        if list == RuleList::Explicit && regex.captures_len() < 2 {
            return Err(RuleError::MissingCaptureGroup {
                name: rule.name.clone(),
            });
        }

        Ok(Self {
            name: rule.name.clone(),
            regex,
            list,
        })
    }

    /// The list this rule was compiled for
    pub fn list(&self) -> RuleList {
        self.list
    }

    /// Borrow the compiled regex
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Run the pattern standalone against sample text
    pub fn match_report(&self, sample: &str) -> MatchReport {
        let matches: Vec<String> = self
            .regex
            .find_iter(sample)
            .map(|m| m.as_str().to_string())
            .collect();

        MatchReport {
            match_count: matches.len(),
            matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rule(name: &str, pattern: &str) -> FormattingRule {
        FormattingRule {
            name: name.to_string(),
            description: String::new(),
            example: String::new(),
            pattern: pattern.to_string(),
            effect: crate::RuleEffect {
                effect_type: "test".to_string(),
                style: BTreeMap::new(),
                tooltip: None,
            },
        }
    }

    #[test]
    fn test_explicit_requires_capture_group() {
        let r = rule("bare", r"\*\*.*?\*\*");
        let err = CompiledRule::compile(&r, RuleList::Explicit).unwrap_err();
        assert!(matches!(err, RuleError::MissingCaptureGroup { .. }));

        let r = rule("grouped", r"\*\*(.*?)\*\*");
        assert!(CompiledRule::compile(&r, RuleList::Explicit).is_ok());
    }

    #[test]
    fn test_automatic_allows_groupless_pattern() {
        let r = rule("money", r"\$[\d,]+(?:\.\d{2})?");
        assert!(CompiledRule::compile(&r, RuleList::Automatic).is_ok());
    }

    #[test]
    fn test_explicit_is_case_sensitive() {
        let r = rule("warning", r"\{warning:(.*?)\}");
        let compiled = CompiledRule::compile(&r, RuleList::Explicit).unwrap();
        assert_eq!(compiled.match_report("{warning:late fee}").match_count, 1);
        assert_eq!(compiled.match_report("{WARNING:late fee}").match_count, 0);
    }

    #[test]
    fn test_automatic_is_case_insensitive() {
        let r = rule("cfr", r"\d+\s+CFR\s+[\d.]+");
        let compiled = CompiledRule::compile(&r, RuleList::Automatic).unwrap();
        assert_eq!(compiled.match_report("12 CFR 1026.43").match_count, 1);
        assert_eq!(compiled.match_report("12 cfr 1026.43").match_count, 1);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let r = rule("broken", r"([unclosed");
        let err = CompiledRule::compile(&r, RuleList::Automatic).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern(_)));
    }

    #[test]
    fn test_oversized_pattern_rejected() {
        let r = rule("huge", &"a".repeat(MAX_REGEX_LENGTH + 1));
        let err = CompiledRule::compile(&r, RuleList::Automatic).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern(_)));
    }

    #[test]
    fn test_match_report_lists_substrings() {
        let r = rule("money", r"\$[\d,]+");
        let compiled = CompiledRule::compile(&r, RuleList::Automatic).unwrap();
        let report = compiled.match_report("Fines of $10,000 and $250 apply.");
        assert_eq!(report.match_count, 2);
        assert_eq!(report.matches, vec!["$10,000", "$250"]);
    }
}
