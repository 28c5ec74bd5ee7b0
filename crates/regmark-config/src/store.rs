//! The rule store - owner of the active formatting configuration
//!
//! Exactly one config is active at a time. Mutations replace rules through
//! the operations below; callers holding a snapshot commit nothing by
//! editing it. Load failures are recovered locally (the prior config stays
//! active) because formatting must keep working even when storage or the
//! network does not.

use crate::remote;
use regmark_engine::{
    codec, default_config, CompiledRule, ConfigValidationError, FormattingConfig, FormattingRule,
    FormattingSettings, RuleList, MAX_RULE_FILE_SIZE,
};
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// File name the active config is persisted under
pub const STORAGE_FILE: &str = "formatting-rules.json";

/// Errors that can occur during store operations
///
/// All of these are non-fatal to formatting: the in-memory config remains
/// authoritative and usable for the session.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Duplicate rule name '{name}' in {list}")]
    DuplicateRuleName { list: RuleList, name: String },

    #[error("Rule '{name}' not found in {list}")]
    RuleNotFound { list: RuleList, name: String },

    #[error(transparent)]
    Validation(#[from] ConfigValidationError),

    #[error("Failed to persist rules to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

/// Named config sources for [`RuleStore::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// The bundled default rule set
    Default,
    /// The persisted local rule file
    Local,
    /// The configured remote rule set URL
    Remote,
}

/// Single source of truth for the active `FormattingConfig`
pub struct RuleStore {
    storage_path: PathBuf,
    remote_url: Option<Url>,
    config: FormattingConfig,
}

impl RuleStore {
    /// Default storage path (`<config dir>/regmark/formatting-rules.json`)
    pub fn storage_path() -> Result<PathBuf, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::ConfigDirNotFound)?;
        Ok(dir.join("regmark").join(STORAGE_FILE))
    }

    /// Open a store backed by the given rule file
    ///
    /// Starts from the bundled defaults; an existing valid local file
    /// overlays them. A missing or malformed local file is logged and
    /// ignored, never fatal.
    pub async fn open(storage_path: &Path) -> Result<Self, StoreError> {
        let mut store = Self {
            storage_path: storage_path.to_path_buf(),
            remote_url: None,
            config: default_config()?,
        };
        store.load(ConfigSource::Local).await;
        Ok(store)
    }

    /// Open a store at the default storage path
    pub async fn open_default() -> Result<Self, StoreError> {
        let path = Self::storage_path()?;
        Self::open(&path).await
    }

    /// Set the remote rule set URL used by `load(ConfigSource::Remote)`
    pub fn set_remote_url(&mut self, url: Url) {
        self.remote_url = Some(url);
    }

    /// Load a config from a named source
    ///
    /// Never fails: on any fetch, read, or validation problem the prior
    /// config stays active and the failure is logged. The replacement, when
    /// it happens, is a wholesale value swap; a concurrent `format` call
    /// observes either the old config or the new one, never a mix.
    pub async fn load(&mut self, source: ConfigSource) -> &FormattingConfig {
        match self.try_load(source).await {
            Ok(Some(config)) => {
                tracing::debug!(?source, "loaded formatting config");
                self.config = config;
            }
            Ok(None) => {}
            Err(message) => {
                tracing::warn!(?source, %message, "config load failed, keeping active config");
            }
        }
        &self.config
    }

    async fn try_load(&self, source: ConfigSource) -> Result<Option<FormattingConfig>, String> {
        match source {
            ConfigSource::Default => {
                let config = default_config().map_err(|e| e.to_string())?;
                Ok(Some(config))
            }
            ConfigSource::Local => {
                match tokio::fs::metadata(&self.storage_path).await {
                    Ok(meta) if meta.len() > MAX_RULE_FILE_SIZE => {
                        return Err(format!(
                            "rule file exceeds {MAX_RULE_FILE_SIZE} bytes: {}",
                            self.storage_path.display()
                        ));
                    }
                    Ok(_) => {}
                    // No local file yet is the normal first-run state.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                    Err(e) => return Err(e.to_string()),
                }

                let text = tokio::fs::read_to_string(&self.storage_path)
                    .await
                    .map_err(|e| e.to_string())?;
                let config = codec::decode(&text).map_err(|e| e.to_string())?;
                Ok(Some(config))
            }
            ConfigSource::Remote => {
                let Some(ref url) = self.remote_url else {
                    return Err("no remote rule set URL configured".to_string());
                };
                let text = remote::fetch_rules(url).await.map_err(|e| e.to_string())?;
                let config = codec::decode(&text).map_err(|e| e.to_string())?;
                Ok(Some(config))
            }
        }
    }

    /// Borrow the active config
    pub fn current(&self) -> &FormattingConfig {
        &self.config
    }

    /// Owned copy of the active config
    ///
    /// Mutating the snapshot commits nothing; commits happen only through
    /// the mutation operations on the store.
    pub fn snapshot(&self) -> FormattingConfig {
        self.config.clone()
    }

    /// Replace the settings wholesale; takes effect on the next format call
    pub fn update_settings(&mut self, settings: FormattingSettings) {
        self.config.settings = settings;
    }

    /// Append a rule to the named list
    ///
    /// Rejected (no-op) when the name already exists in that list or the
    /// pattern does not compile for that list's matching mode.
    pub fn add_rule(&mut self, list: RuleList, rule: FormattingRule) -> Result<(), StoreError> {
        if self.config.rules(list).iter().any(|r| r.name == rule.name) {
            return Err(StoreError::DuplicateRuleName {
                list,
                name: rule.name,
            });
        }

        self.validate_pattern(list, &rule)?;
        self.config.rules_mut(list).push(rule);
        Ok(())
    }

    /// Replace the rule matching `name` in the named list
    pub fn update_rule(
        &mut self,
        list: RuleList,
        name: &str,
        rule: FormattingRule,
    ) -> Result<(), StoreError> {
        let index = self
            .config
            .rules(list)
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| StoreError::RuleNotFound {
                list,
                name: name.to_string(),
            })?;

        // A rename must not collide with another rule in the list.
        if rule.name != name && self.config.rules(list).iter().any(|r| r.name == rule.name) {
            return Err(StoreError::DuplicateRuleName {
                list,
                name: rule.name,
            });
        }

        self.validate_pattern(list, &rule)?;
        self.config.rules_mut(list)[index] = rule;
        Ok(())
    }

    /// Remove the rule matching `name` from the named list
    pub fn remove_rule(&mut self, list: RuleList, name: &str) -> Result<(), StoreError> {
        let rules = self.config.rules_mut(list);
        let index = rules.iter().position(|r| r.name == name).ok_or_else(|| {
            StoreError::RuleNotFound {
                list,
                name: name.to_string(),
            }
        })?;

        rules.remove(index);
        Ok(())
    }

    /// Restore the bundled default config, discarding all customization
    pub fn reset_to_default(&mut self) -> Result<(), StoreError> {
        self.config = default_config()?;
        Ok(())
    }

    /// Replace the active config from an imported rule file
    ///
    /// All-or-nothing: validation failure leaves the active config intact.
    pub fn import(&mut self, text: &str) -> Result<(), StoreError> {
        let config = codec::decode(text)?;
        self.config = config;
        Ok(())
    }

    /// Serialize the active config in the export/persist format
    pub fn export(&self) -> String {
        codec::encode(&self.config)
    }

    /// Persist the active config to the local rule file
    ///
    /// Uses a temporary file and atomic rename to prevent corruption.
    /// Failure is reported, not fatal; the in-memory config stays usable.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let persist_err = |source: io::Error| StoreError::Persist {
            path: self.storage_path.clone(),
            source,
        };

        if let Some(parent) = self.storage_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(persist_err)?;
        }

        let text = self.export();
        let temp_path = self.storage_path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &text)
            .await
            .map_err(persist_err)?;
        tokio::fs::rename(&temp_path, &self.storage_path)
            .await
            .map_err(persist_err)?;

        Ok(())
    }

    fn validate_pattern(&self, list: RuleList, rule: &FormattingRule) -> Result<(), StoreError> {
        CompiledRule::compile(rule, list)
            .map(|_| ())
            .map_err(|e| {
                StoreError::Validation(ConfigValidationError::InvalidPattern {
                    list,
                    name: rule.name.clone(),
                    message: e.to_string(),
                })
            })
    }
}
