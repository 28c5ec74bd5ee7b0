use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use regmark_config::{RuleStore, StoreError};
use regmark_engine::{FormattingRule, Formatter, RuleEffect, RuleList};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use super::format::open_store;

#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// List all rules in both lists
    List,

    /// Add a rule
    Add {
        /// Rule name (unique within its list)
        #[arg(long)]
        name: String,

        /// Human-readable explanation (rendered as the tooltip)
        #[arg(long, default_value = "")]
        description: String,

        /// Sample input demonstrating the rule
        #[arg(long, default_value = "")]
        example: String,

        /// Regular expression; explicit rules need one capturing group
        #[arg(long)]
        pattern: String,

        /// Class name placed on the rendered wrapper
        #[arg(long)]
        effect_type: String,

        /// Inline style declaration, property=value (repeatable)
        #[arg(long = "style", value_name = "PROP=VALUE")]
        styles: Vec<String>,

        /// Do not render the description as a tooltip
        #[arg(long)]
        no_tooltip: bool,

        /// Add to the automatic (content-sniffing) list instead of the explicit list
        #[arg(long)]
        automatic: bool,
    },

    /// Remove a rule by name
    Remove {
        name: String,

        /// Remove from the automatic list instead of the explicit list
        #[arg(long)]
        automatic: bool,
    },

    /// Test a pattern (or a stored rule) against sample text
    Test {
        /// Sample text to match against
        sample: String,

        /// Pattern to test (mutually exclusive with --name)
        #[arg(long)]
        pattern: Option<String>,

        /// Stored rule to test (mutually exclusive with --pattern)
        #[arg(long)]
        name: Option<String>,

        /// Treat the pattern as automatic (case-insensitive, no group required)
        #[arg(long)]
        automatic: bool,
    },

    /// Preview how a draft rule formats sample text, without saving it
    Preview {
        /// Sample text to format
        sample: String,

        /// Regular expression for the draft rule
        #[arg(long)]
        pattern: String,

        /// Class name for the draft rule's wrapper
        #[arg(long, default_value = "preview")]
        effect_type: String,

        /// Treat the draft as an automatic rule
        #[arg(long)]
        automatic: bool,
    },

    /// Write the active rule set to a file
    Export {
        /// Output path (defaults to ./formatting-rules.json)
        #[arg(default_value = "formatting-rules.json")]
        output: PathBuf,
    },

    /// Replace the active rule set from a file
    Import { input: PathBuf },

    /// Restore the bundled default rule set
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the rule file path
    Path,
}

pub fn handle_rules_command(cmd: RulesCommand, rules_path: Option<PathBuf>) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;

    runtime.block_on(async {
        match cmd {
            RulesCommand::List => list_rules(rules_path).await,
            RulesCommand::Add {
                name,
                description,
                example,
                pattern,
                effect_type,
                styles,
                no_tooltip,
                automatic,
            } => {
                let rule = FormattingRule {
                    name,
                    description,
                    example,
                    pattern,
                    effect: RuleEffect {
                        effect_type,
                        style: parse_styles(&styles)?,
                        tooltip: no_tooltip.then_some(false),
                    },
                };
                add_rule(rules_path, list_kind(automatic), rule).await
            }
            RulesCommand::Remove { name, automatic } => {
                remove_rule(rules_path, list_kind(automatic), name).await
            }
            RulesCommand::Test {
                sample,
                pattern,
                name,
                automatic,
            } => test_rule(rules_path, sample, pattern, name, automatic).await,
            RulesCommand::Preview {
                sample,
                pattern,
                effect_type,
                automatic,
            } => preview_rule(rules_path, sample, pattern, effect_type, automatic).await,
            RulesCommand::Export { output } => export_rules(rules_path, output).await,
            RulesCommand::Import { input } => import_rules(rules_path, input).await,
            RulesCommand::Reset { yes } => reset_rules(rules_path, yes).await,
            RulesCommand::Path => show_rules_path(rules_path),
        }
    })
}

fn list_kind(automatic: bool) -> RuleList {
    if automatic {
        RuleList::Automatic
    } else {
        RuleList::Explicit
    }
}

/// Parse repeated `property=value` style flags into a style map
fn parse_styles(styles: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for entry in styles {
        let (property, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid style '{entry}': expected PROP=VALUE"))?;
        map.insert(property.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}

async fn list_rules(rules_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(rules_path).await?;
    let config = store.current();

    for (heading, list) in [
        ("Explicit rules (formattingRules)", RuleList::Explicit),
        ("Automatic rules (automaticFormatting)", RuleList::Automatic),
    ] {
        println!("\n{heading}:");
        println!("{}", "=".repeat(60));
        for rule in config.rules(list) {
            println!("\n  {} [{}]", rule.name, rule.effect.effect_type);
            println!("    {}", rule.description);
            println!("    pattern: {}", rule.pattern);
            if !rule.example.is_empty() {
                println!("    example: {}", rule.example);
            }
        }
    }

    let settings = &config.settings;
    println!("\nSettings:");
    println!("  enabled: {}", settings.enabled);
    println!(
        "  allowNestedFormatting: {}",
        settings.allow_nested_formatting
    );
    println!(
        "  preserveOriginalMarkers: {}",
        settings.preserve_original_markers
    );
    Ok(())
}

async fn add_rule(
    rules_path: Option<PathBuf>,
    list: RuleList,
    rule: FormattingRule,
) -> Result<()> {
    let mut store = open_store(rules_path).await?;
    let name = rule.name.clone();

    match store.add_rule(list, rule) {
        Ok(()) => {}
        Err(e @ StoreError::DuplicateRuleName { .. }) => bail!("{e}"),
        Err(e) => return Err(e).with_context(|| format!("Failed to add rule '{name}'")),
    }

    store.persist().await?;
    println!("✓ Added rule '{name}' to {list}");
    Ok(())
}

async fn remove_rule(rules_path: Option<PathBuf>, list: RuleList, name: String) -> Result<()> {
    let mut store = open_store(rules_path).await?;
    store
        .remove_rule(list, &name)
        .with_context(|| format!("Failed to remove rule '{name}'"))?;
    store.persist().await?;
    println!("✓ Removed rule '{name}' from {list}");
    Ok(())
}

async fn test_rule(
    rules_path: Option<PathBuf>,
    sample: String,
    pattern: Option<String>,
    name: Option<String>,
    automatic: bool,
) -> Result<()> {
    let (rule, list) = match (pattern, name) {
        (Some(pattern), None) => {
            let draft = FormattingRule {
                name: "draft".to_string(),
                description: String::new(),
                example: String::new(),
                pattern,
                effect: RuleEffect {
                    effect_type: "draft".to_string(),
                    style: BTreeMap::new(),
                    tooltip: None,
                },
            };
            (draft, list_kind(automatic))
        }
        (None, Some(name)) => {
            let store = open_store(rules_path).await?;
            let list = list_kind(automatic);
            let rule = store
                .current()
                .rules(list)
                .iter()
                .find(|r| r.name == name)
                .cloned()
                .ok_or_else(|| anyhow!("Rule not found in {list}: {name}"))?;
            (rule, list)
        }
        _ => bail!("Provide exactly one of --pattern or --name"),
    };

    let report = Formatter::test_rule(&rule, list, &sample)
        .with_context(|| format!("Pattern for '{}' is invalid", rule.name))?;

    println!("{} match(es)", report.match_count);
    for matched in &report.matches {
        println!("  {matched}");
    }
    Ok(())
}

async fn preview_rule(
    rules_path: Option<PathBuf>,
    sample: String,
    pattern: String,
    effect_type: String,
    automatic: bool,
) -> Result<()> {
    let store = open_store(rules_path).await?;
    let list = list_kind(automatic);

    // Draft config: the committed rules plus the uncommitted rule, so the
    // preview shows exactly what a save would produce.
    let mut draft = store.snapshot();
    draft.rules_mut(list).push(FormattingRule {
        name: "draft".to_string(),
        description: "Draft rule".to_string(),
        example: String::new(),
        pattern,
        effect: RuleEffect {
            effect_type,
            style: BTreeMap::new(),
            tooltip: None,
        },
    });

    println!("{}", Formatter::format(&sample, &draft));
    Ok(())
}

async fn export_rules(rules_path: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let store = open_store(rules_path).await?;
    tokio::fs::write(&output, store.export())
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("✓ Exported rules to {}", output.display());
    Ok(())
}

async fn import_rules(rules_path: Option<PathBuf>, input: PathBuf) -> Result<()> {
    let mut store = open_store(rules_path).await?;
    let text = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    store
        .import(&text)
        .with_context(|| format!("Rejected rule file {}", input.display()))?;
    store.persist().await?;

    println!("✓ Imported rules from {}", input.display());
    Ok(())
}

async fn reset_rules(rules_path: Option<PathBuf>, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        print!("Discard all customized rules and restore defaults? [y/N] ");

        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut store = open_store(rules_path).await?;
    store.reset_to_default()?;
    store.persist().await?;
    println!("✓ Restored the bundled default rule set");
    Ok(())
}

fn show_rules_path(rules_path: Option<PathBuf>) -> Result<()> {
    let path = match rules_path {
        Some(path) => path,
        None => RuleStore::storage_path()?,
    };
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_styles() {
        let styles = parse_styles(&[
            "color=#b91c1c".to_string(),
            "font-weight = 700".to_string(),
        ])
        .unwrap();
        assert_eq!(styles["color"], "#b91c1c");
        assert_eq!(styles["font-weight"], "700");

        assert!(parse_styles(&["no-equals".to_string()]).is_err());
    }
}
