//! Security and performance constants for the annotation engine
//!
//! These constants define limits to prevent various attack vectors:
//! - ReDoS (Regular Expression Denial of Service)
//! - Memory exhaustion from pathological patterns or oversized rule files

/// Class token carried by every wrapper span
///
/// Rationale: a fixed marker class lets consumers style all annotations
/// uniformly, and lets the engine recognize its own output when nested
/// formatting is disallowed.
pub const WRAPPER_CLASS: &str = "regmark-annotation";

/// Maximum regex pattern length (500 characters)
///
/// Rationale: Extremely long regex patterns are often a sign of
/// malicious input or poor design. This limit prevents ReDoS attacks
/// and keeps patterns maintainable.
pub const MAX_REGEX_LENGTH: usize = 500;

/// Compiled regex size limit (10MB)
///
/// Rationale: Limits memory usage of compiled regex patterns.
/// Prevents memory exhaustion from pathological patterns.
/// Applied during regex compilation via RegexBuilder.
pub const REGEX_SIZE_LIMIT: usize = 10_000_000; // 10MB

/// Regex DFA size limit (2MB)
///
/// Rationale: Limits the size of the deterministic finite automaton
/// used by the regex engine. Prevents excessive memory usage during
/// pattern matching operations.
pub const REGEX_DFA_SIZE_LIMIT: usize = 2_000_000; // 2MB

/// Maximum size for imported rule files (1MB)
///
/// Rationale: Rule files are small configuration documents. Larger
/// files may indicate malicious content or misconfiguration.
pub const MAX_RULE_FILE_SIZE: u64 = 1_048_576; // 1MB
