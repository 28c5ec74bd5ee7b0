//! Bundled default rule set embedded in the binary
//!
//! The defaults ship ten explicit rules (author markup like `**bold**` and
//! `{date: ...}`) and five automatic rules (deadline phrases, monetary
//! amounts, percentages, key industry terms, CFR references). They are
//! embedded at compile time via `include_str!()` for zero-config startup
//! and may be replaced wholesale via import or reset.

use crate::codec;
use crate::rule::FormattingConfig;

/// The bundled default rule file
pub const DEFAULT_RULES: &str = include_str!("built_in/default_rules.json");

/// Decode the bundled default config
///
/// Goes through the same codec validation as any import, so a defect in the
/// embedded file surfaces as an error instead of a half-applied config.
pub fn default_config() -> Result<FormattingConfig, codec::ConfigValidationError> {
    codec::decode(DEFAULT_RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::CompiledRule;
    use crate::rule::RuleList;

    #[test]
    fn test_default_config_parses() {
        let config = default_config().expect("bundled rules must validate");
        assert_eq!(config.formatting_rules.len(), 10);
        assert_eq!(config.automatic_formatting.len(), 5);
        assert!(config.settings.enabled);
    }

    #[test]
    fn test_every_default_pattern_compiles() {
        let config = default_config().unwrap();
        for rule in &config.formatting_rules {
            CompiledRule::compile(rule, RuleList::Explicit)
                .unwrap_or_else(|e| panic!("explicit rule '{}': {e}", rule.name));
        }
        for rule in &config.automatic_formatting {
            CompiledRule::compile(rule, RuleList::Automatic)
                .unwrap_or_else(|e| panic!("automatic rule '{}': {e}", rule.name));
        }
    }

    #[test]
    fn test_default_examples_match_their_rules() {
        // A rule's example should demonstrate the rule it documents.
        let config = default_config().unwrap();
        for (list, rules) in [
            (RuleList::Explicit, &config.formatting_rules),
            (RuleList::Automatic, &config.automatic_formatting),
        ] {
            for rule in rules {
                let compiled = CompiledRule::compile(rule, list).unwrap();
                assert!(
                    compiled.match_report(&rule.example).match_count > 0,
                    "example for '{}' does not match its own pattern",
                    rule.name
                );
            }
        }
    }

    #[test]
    fn test_round_trip_of_defaults() {
        let config = default_config().unwrap();
        let decoded = codec::decode(&codec::encode(&config)).unwrap();
        assert_eq!(decoded, config);
    }
}
