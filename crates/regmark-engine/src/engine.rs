//! Formatting pipeline - applies rule lists to raw text
//!
//! The pipeline is sequential by contract: each rule performs one
//! `replace_all` pass over the *current* state of the text, so later rules
//! see earlier rules' inserted wrappers. That is the mechanism by which
//! nested annotations compose, and also means a later pattern can match
//! inside an earlier wrapper's attributes. The whole trade-off is isolated
//! in [`apply_rule_pass`] so a non-interfering strategy (span collection
//! with a single render pass) could replace it without touching the
//! `format` contract.

use crate::constants::WRAPPER_CLASS;
use crate::matcher::{CompiledRule, MatchReport};
use crate::markup::{Markup, SpanBuilder};
use crate::rule::{FormattingConfig, FormattingRule, FormattingSettings, RuleList};
use crate::Result;
use regex::Captures;

/// The annotation formatter
///
/// Stateless: `format` is pure with respect to its two inputs, which is
/// what lets the rule editor preview a draft config that has not been
/// committed to any store.
pub struct Formatter;

impl Formatter {
    /// Transform raw text into annotated markup using the given config
    ///
    /// Never fails: a rule whose pattern does not compile is skipped with a
    /// warning and the remaining rules still run, so one bad rule cannot
    /// blank an entire summary. With `settings.enabled = false`, or empty
    /// input, the text passes through unchanged.
    pub fn format(text: &str, config: &FormattingConfig) -> Markup {
        if !config.settings.enabled || text.is_empty() {
            return Markup::new(text.to_string());
        }

        let mut current = text.to_string();

        for rule in &config.formatting_rules {
            current = apply_rule_pass(&current, rule, RuleList::Explicit, &config.settings);
        }
        for rule in &config.automatic_formatting {
            current = apply_rule_pass(&current, rule, RuleList::Automatic, &config.settings);
        }

        tracing::debug!(
            input_len = text.len(),
            output_len = current.len(),
            "formatted text"
        );

        Markup::new(current)
    }

    /// Run a single rule's pattern standalone against sample text
    ///
    /// Reports how many times it matched and what it matched, without
    /// applying any effect. Used to validate a rule while authoring it,
    /// before it is committed to a store.
    pub fn test_rule(
        rule: &FormattingRule,
        list: RuleList,
        sample: &str,
    ) -> Result<MatchReport> {
        let compiled = CompiledRule::compile(rule, list)?;
        Ok(compiled.match_report(sample))
    }
}

/// One linear replacement pass for one rule over the current text
///
/// Explicit rules replace the whole match with a wrapper around the first
/// capturing group's content (the literal delimiters are discarded unless
/// `preserveOriginalMarkers` is set); automatic rules wrap the whole match
/// verbatim. When nesting is disallowed, a match that already contains
/// engine-inserted wrapper markup is left untouched.
fn apply_rule_pass(
    text: &str,
    rule: &FormattingRule,
    list: RuleList,
    settings: &FormattingSettings,
) -> String {
    let compiled = match CompiledRule::compile(rule, list) {
        Ok(compiled) => compiled,
        Err(e) => {
            tracing::warn!(rule = %rule.name, error = %e, "skipping rule with invalid pattern");
            return text.to_string();
        }
    };

    let mut builder = SpanBuilder::new()
        .class(WRAPPER_CLASS)
        .class(&rule.effect.effect_type)
        .styles(&rule.effect.style);
    if rule.effect.show_tooltip() {
        builder = builder.title(&rule.description);
    }

    compiled
        .regex()
        .replace_all(text, |caps: &Captures| {
            let whole = caps.get(0).map_or("", |m| m.as_str());

            if !settings.allow_nested_formatting && whole.contains(WRAPPER_CLASS) {
                return whole.to_string();
            }

            let body = if list == RuleList::Explicit && !settings.preserve_original_markers {
                caps.get(1).map_or(whole, |m| m.as_str())
            } else {
                whole
            };

            builder.wrap(body)
        })
        .into_owned()
}
