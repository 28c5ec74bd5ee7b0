use anyhow::{Context, Result};
use regmark_config::{ConfigSource, RuleStore};
use regmark_engine::Formatter;
use std::io::Read;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use url::Url;

/// Open the store at the given (or default) rule file path
pub(crate) async fn open_store(rules_path: Option<PathBuf>) -> Result<RuleStore> {
    match rules_path {
        Some(path) => RuleStore::open(&path)
            .await
            .with_context(|| format!("Failed to open rule file {}", path.display())),
        None => RuleStore::open_default()
            .await
            .context("Failed to open the default rule file"),
    }
}

pub fn handle_format(
    input: Option<PathBuf>,
    rules_path: Option<PathBuf>,
    remote: Option<Url>,
) -> Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;

    runtime.block_on(async {
        let mut store = open_store(rules_path).await?;

        if let Some(url) = remote {
            store.set_remote_url(url);
            store.load(ConfigSource::Remote).await;
        }

        let text = read_input(input)?;
        let markup = Formatter::format(&text, store.current());
        println!("{markup}");
        Ok(())
    })
}

fn read_input(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
