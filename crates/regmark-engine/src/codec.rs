//! Config serialization and import validation
//!
//! Encoding is deterministic pretty-printed JSON with fields in declaration
//! order, kept stable for diffability. Decoding is all-or-nothing: any
//! structural mismatch, duplicate rule name, or non-compiling pattern
//! rejects the whole document so an import can never partially apply.

use crate::matcher::CompiledRule;
use crate::rule::{FormattingConfig, RuleList};
use std::collections::HashSet;

/// Decode-time validation failures, surfaced verbatim to the user
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Not a valid rule file: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("Duplicate rule name '{name}' in {list}")]
    DuplicateName { list: RuleList, name: String },

    #[error("Rule '{name}' in {list} has an invalid pattern: {message}")]
    InvalidPattern {
        list: RuleList,
        name: String,
        message: String,
    },
}

/// Serialize a config to its transport format
pub fn encode(config: &FormattingConfig) -> String {
    // FormattingConfig serialization is infallible: plain structs, string
    // maps, no non-string keys.
    serde_json::to_string_pretty(config).unwrap_or_default()
}

/// Parse and validate a config from its transport format
///
/// Round-trip law: `decode(&encode(config))` is structurally equal to
/// `config` for any valid config, including list order.
pub fn decode(text: &str) -> Result<FormattingConfig, ConfigValidationError> {
    let config: FormattingConfig = serde_json::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Structural validation beyond JSON shape
///
/// Enforces the invariants the store relies on: unique names per list and
/// patterns that compile (with a capturing group for explicit rules).
pub fn validate(config: &FormattingConfig) -> Result<(), ConfigValidationError> {
    for list in [RuleList::Explicit, RuleList::Automatic] {
        let mut seen = HashSet::new();
        for rule in config.rules(list) {
            if !seen.insert(rule.name.as_str()) {
                return Err(ConfigValidationError::DuplicateName {
                    list,
                    name: rule.name.clone(),
                });
            }

            CompiledRule::compile(rule, list).map_err(|e| {
                ConfigValidationError::InvalidPattern {
                    list,
                    name: rule.name.clone(),
                    message: e.to_string(),
                }
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{FormattingRule, FormattingSettings, RuleEffect};
    use std::collections::BTreeMap;

    fn sample_config() -> FormattingConfig {
        let mut style = BTreeMap::new();
        style.insert("font-weight".to_string(), "700".to_string());

        FormattingConfig {
            formatting_rules: vec![FormattingRule {
                name: "boldImportant".to_string(),
                description: "Key obligations".to_string(),
                example: "**must file**".to_string(),
                pattern: r"\*\*(.*?)\*\*".to_string(),
                effect: RuleEffect {
                    effect_type: "bold".to_string(),
                    style,
                    tooltip: None,
                },
            }],
            automatic_formatting: vec![FormattingRule {
                name: "monetaryAmount".to_string(),
                description: "Dollar amounts".to_string(),
                example: "$10,000".to_string(),
                pattern: r"\$[\d,]+(?:\.\d{2})?".to_string(),
                effect: RuleEffect {
                    effect_type: "money".to_string(),
                    style: BTreeMap::new(),
                    tooltip: Some(false),
                },
            }],
            settings: FormattingSettings::default(),
        }
    }

    #[test]
    fn test_round_trip_is_exact() {
        let config = sample_config();
        let decoded = decode(&encode(&config)).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_encode_uses_wire_field_names() {
        let text = encode(&sample_config());
        assert!(text.contains("\"formattingRules\""));
        assert!(text.contains("\"automaticFormatting\""));
        assert!(text.contains("\"allowNestedFormatting\""));
        assert!(text.contains("\"type\": \"bold\""));
    }

    #[test]
    fn test_decode_rejects_missing_section() {
        let err = decode(r#"{ "formattingRules": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigValidationError::Shape(_)));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(decode("[]").is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn test_decode_rejects_duplicate_names() {
        let mut config = sample_config();
        let dup = config.formatting_rules[0].clone();
        config.formatting_rules.push(dup);

        let err = decode(&encode(&config)).unwrap_err();
        assert!(matches!(
            err,
            ConfigValidationError::DuplicateName {
                list: RuleList::Explicit,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_rejects_bad_pattern() {
        let mut config = sample_config();
        config.automatic_formatting[0].pattern = "([unclosed".to_string();

        let err = decode(&encode(&config)).unwrap_err();
        assert!(matches!(err, ConfigValidationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_decode_rejects_groupless_explicit_pattern() {
        let mut config = sample_config();
        config.formatting_rules[0].pattern = r"\*\*.*?\*\*".to_string();

        let err = decode(&encode(&config)).unwrap_err();
        assert!(matches!(
            err,
            ConfigValidationError::InvalidPattern {
                list: RuleList::Explicit,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_names_across_lists_are_allowed() {
        let mut config = sample_config();
        config.automatic_formatting[0].name = config.formatting_rules[0].name.clone();
        assert!(decode(&encode(&config)).is_ok());
    }
}
