//! Keyword Pattern Classifier
//!
//! Labels a keyword by the first case-insensitive rule that occurs in it.
//! Falls back to "non brand".

use kwgap_common::PatternMode;

use crate::models::NON_BRAND_LABEL;

/// Label a keyword
pub fn label_keyword(keyword: &str, mode: &PatternMode) -> String {
    match mode {
        PatternMode::Skip => NON_BRAND_LABEL.to_string(),
        PatternMode::Rules(rules) => rules
            .iter()
            .find(|rule| rule.regex.is_match(keyword))
            .map(|rule| rule.label.clone())
            .unwrap_or_else(|| NON_BRAND_LABEL.to_string()),
    }
}
