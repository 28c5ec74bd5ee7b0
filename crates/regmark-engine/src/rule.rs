//! Rule definitions and configuration types
//!
//! This module defines the structure of formatting rules as they appear in
//! JSON rule files. Field names are camelCase on the wire so exported files
//! stay interchangeable with the hosting application's format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single formatting rule
///
/// Explicit rules match user-authored markup (e.g. `**bold**`,
/// `{date: March 1}`) and must carry one capturing group whose content
/// becomes the visible text. Automatic rules sniff content (dollar amounts,
/// CFR references) and wrap the whole match verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingRule {
    /// Rule name, unique within its list
    pub name: String,

    /// Human-readable explanation, rendered as the wrapper's tooltip
    pub description: String,

    /// Sample input demonstrating the rule; shown by the tester, never evaluated
    pub example: String,

    /// Regular expression source string
    pub pattern: String,

    /// Visual effect applied to matches
    pub effect: RuleEffect,
}

/// Visual effect carried by a rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEffect {
    /// Class name placed on the rendered wrapper
    #[serde(rename = "type")]
    pub effect_type: String,

    /// Inline style declarations (CSS property -> value, order irrelevant)
    #[serde(default)]
    pub style: BTreeMap<String, String>,

    /// Whether to render the rule description as a tooltip (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<bool>,
}

impl RuleEffect {
    /// Tooltip rendering defaults to on when unspecified
    pub fn show_tooltip(&self) -> bool {
        self.tooltip.unwrap_or(true)
    }
}

/// Engine-wide toggles
///
/// Exactly these three fields; an imported settings object with extra keys
/// is a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormattingSettings {
    /// Master switch; when false the formatter is a pass-through
    pub enabled: bool,

    /// Allow later rules to re-wrap text already wrapped by earlier rules
    pub allow_nested_formatting: bool,

    /// Keep the literal delimiter markers (`**`, `{date: }`) inside the wrapper
    pub preserve_original_markers: bool,
}

impl Default for FormattingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_nested_formatting: true,
            preserve_original_markers: false,
        }
    }
}

/// The complete rule configuration
///
/// Exactly one config is active at a time; rule order within each list is
/// significant because rules apply sequentially over evolving text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingConfig {
    /// Explicit rules (user-authored markup), applied first, in order
    pub formatting_rules: Vec<FormattingRule>,

    /// Automatic rules (content sniffing), applied after all explicit rules
    pub automatic_formatting: Vec<FormattingRule>,

    /// Engine toggles
    pub settings: FormattingSettings,
}

impl FormattingConfig {
    /// Borrow the named rule list
    pub fn rules(&self, list: RuleList) -> &[FormattingRule] {
        match list {
            RuleList::Explicit => &self.formatting_rules,
            RuleList::Automatic => &self.automatic_formatting,
        }
    }

    /// Mutably borrow the named rule list
    pub fn rules_mut(&mut self, list: RuleList) -> &mut Vec<FormattingRule> {
        match list {
            RuleList::Explicit => &mut self.formatting_rules,
            RuleList::Automatic => &mut self.automatic_formatting,
        }
    }
}

/// Names the two independent rule namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RuleList {
    /// `formattingRules`: exact, case-sensitive author markup
    #[serde(rename = "formattingRules")]
    Explicit,

    /// `automaticFormatting`: case-insensitive content sniffing
    #[serde(rename = "automaticFormatting")]
    Automatic,
}

impl std::fmt::Display for RuleList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleList::Explicit => write!(f, "formattingRules"),
            RuleList::Automatic => write!(f, "automaticFormatting"),
        }
    }
}
