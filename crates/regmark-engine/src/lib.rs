//! Regmark engine - rule-based annotation for regulatory document text
//!
//! This crate turns AI-generated plain text into annotated markup by applying
//! an ordered set of regex-driven formatting rules, each carrying a visual
//! effect (class, inline styles, tooltip).
//!
//! # Architecture
//!
//! - **Rule model**: declarative JSON rules, two independent lists (explicit
//!   author markup and automatic content sniffing)
//! - **Compiled matching**: regex patterns compiled with defensive limits
//! - **Sequential pipeline**: each rule rewrites the output of the previous
//!   one, which is how nested annotations compose
//!
//! # Example
//!
//! ```
//! use regmark_engine::{default_config, Formatter};
//!
//! let config = default_config().expect("bundled rules parse");
//! let markup = Formatter::format("Payment of **$5,000** is due.", &config);
//! assert!(markup.as_str().contains("<span"));
//! ```

pub mod constants;
pub mod rule;
pub mod matcher;
pub mod markup;
pub mod engine;
pub mod codec;
pub mod built_in;

// Re-export core types
pub use constants::*;
pub use rule::{FormattingConfig, FormattingRule, FormattingSettings, RuleEffect, RuleList};
pub use matcher::{CompiledRule, MatchReport};
pub use markup::{Markup, SpanBuilder};
pub use engine::Formatter;
pub use codec::{decode, encode, ConfigValidationError};
pub use built_in::default_config;

/// Result type for rule operations
pub type Result<T> = std::result::Result<T, RuleError>;

/// Error types for the annotation engine
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Rule '{name}' needs a capturing group: explicit rules wrap the first group's content")]
    MissingCaptureGroup { name: String },

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}
