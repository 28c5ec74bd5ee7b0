mod format;
mod rules;

pub use format::handle_format;
pub use rules::{handle_rules_command, RulesCommand};
