//! End-to-end pipeline tests against the bundled default rule set

use regmark_engine::{decode, default_config, encode, Formatter, RuleList};

#[test]
fn disabled_config_passes_text_through() {
    let mut config = default_config().unwrap();
    config.settings.enabled = false;
    let text = "Pay **$5,000** no later than {date: March 1, 2026}.";
    assert_eq!(Formatter::format(text, &config).as_str(), text);
}

#[test]
fn explicit_markers_are_stripped_and_words_survive() {
    let config = default_config().unwrap();
    let out = Formatter::format("a **b** c", &config);
    let markup = out.as_str();

    assert!(!markup.contains("**"));
    assert!(markup.contains(">b</span>"));
    // Visible words are unchanged once tags are ignored.
    assert!(markup.starts_with("a "));
    assert!(markup.ends_with(" c"));
}

#[test]
fn monetary_amounts_are_preserved_verbatim() {
    let config = default_config().unwrap();
    let out = Formatter::format("The fine is $10,000.", &config);
    assert!(out.as_str().contains(">$10,000</span>"));
}

#[test]
fn date_marker_renders_class_style_and_tooltip() {
    let config = default_config().unwrap();
    let out = Formatter::format("Effective {date: January 1, 2026}.", &config);
    let markup = out.as_str();

    assert!(markup.contains("class=\"regmark-annotation date\""));
    assert!(markup.contains("style=\""));
    assert!(markup.contains("title=\"Compliance or effective date\""));
    assert!(markup.contains(">January 1, 2026</span>"));
}

#[test]
fn cfr_references_match_any_capitalization() {
    let config = default_config().unwrap();

    let upper = Formatter::format("See 12 CFR 1026.43 for details.", &config);
    assert!(upper.as_str().contains("cfr"));
    assert!(upper.as_str().contains(">12 CFR 1026.43</span>"));

    let lower = Formatter::format("See 12 cfr 1026.43 for details.", &config);
    assert!(lower.as_str().contains(">12 cfr 1026.43</span>"));
}

#[test]
fn warning_marker_is_case_sensitive() {
    let config = default_config().unwrap();
    let out = Formatter::format("{WARNING:text}", &config);
    assert_eq!(out.as_str(), "{WARNING:text}");
}

#[test]
fn one_broken_rule_does_not_affect_the_rest() {
    let mut config = default_config().unwrap();
    // Sneak an unparsable pattern past import validation, as a stale store
    // state would; format must isolate it at apply time.
    config.automatic_formatting[0].pattern = "([unclosed".to_string();

    let out = Formatter::format("Pay $10,000 by the **due date**.", &config);
    let markup = out.as_str();
    assert!(markup.contains(">$10,000</span>"));
    assert!(markup.contains(">due date</span>"));
}

#[test]
fn explicit_rules_run_before_automatic_rules() {
    let config = default_config().unwrap();
    let out = Formatter::format("**$5,000**", &config);
    let markup = out.as_str();

    // Bold wraps first, then the money sniffer wraps the amount inside it.
    let bold_at = markup.find("bold").unwrap();
    let money_at = markup.find("money").unwrap();
    assert!(bold_at < money_at);
}

#[test]
fn export_import_round_trip_preserves_everything() {
    let config = default_config().unwrap();
    let restored = decode(&encode(&config)).unwrap();
    assert_eq!(restored, config);
    assert_eq!(
        restored.rules(RuleList::Explicit).len(),
        config.formatting_rules.len()
    );
}

#[test]
fn empty_input_formats_to_empty() {
    let config = default_config().unwrap();
    assert_eq!(Formatter::format("", &config).as_str(), "");
}
