//! `Label: Pattern` rule string parsing
//!
//! Category and keyword-pattern rules arrive as free text such as
//! `Blog: example.com/blog/, Product: example.com/product`. Pairs are
//! separated by commas and split on the **first** colon only, so patterns
//! may contain colons themselves (`Secure: https://`). Both sides are
//! whitespace-trimmed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, RuleKind};

/// One parsed rule: a label and the regular expression that selects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePair {
    pub label: String,
    pub pattern: String,
}

impl RulePair {
    pub fn new(label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pattern: pattern.into(),
        }
    }
}

/// Parse a comma-separated list of `Label: Pattern` pairs
///
/// Order is preserved; it is the evaluation order of the rules.
///
/// # Errors
/// `Error::ConfigFormat` naming the first fragment that has no colon or an
/// empty label. Blank text and empty fragments (`"A: a,,B: b"`, a trailing
/// comma) have no colon and are rejected too.
///
/// # Examples
/// ```
/// use kwgap_common::rules::parse_rule_pairs;
/// use kwgap_common::RuleKind;
///
/// let rules = parse_rule_pairs("Secure: https://, Blog: /blog/", RuleKind::Category).unwrap();
/// assert_eq!(rules[0].label, "Secure");
/// assert_eq!(rules[0].pattern, "https://");
/// assert_eq!(rules[1].pattern, "/blog/");
/// ```
pub fn parse_rule_pairs(input: &str, kind: RuleKind) -> Result<Vec<RulePair>> {
    input
        .split(',')
        .map(|fragment| parse_rule_pair(fragment, kind))
        .collect()
}

/// Parse a single `Label: Pattern` fragment
pub fn parse_rule_pair(fragment: &str, kind: RuleKind) -> Result<RulePair> {
    let invalid = || Error::ConfigFormat {
        kind,
        pair: fragment.trim().to_string(),
    };

    let (label, pattern) = fragment.split_once(':').ok_or_else(invalid)?;
    let label = label.trim();
    if label.is_empty() {
        return Err(invalid());
    }

    Ok(RulePair::new(label, pattern.trim()))
}
