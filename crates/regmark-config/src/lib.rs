//! Rule configuration store for the regmark annotation engine
//!
//! Single source of truth for the active `FormattingConfig`: loads it from
//! the bundled defaults, the local rule file, or a remote rule set, persists
//! it atomically, and applies editor mutations with typed non-fatal errors.

pub mod remote;
pub mod store;

pub use store::{ConfigSource, RuleStore, StoreError};
