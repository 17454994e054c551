//! Category Classifier
//!
//! Assigns a page category from the ranking URL. Always returns a value:
//! unmatched and absent URLs fall back to "Other".

use kwgap_common::config::CategoryRule;
use kwgap_common::CategoryMode;

use crate::models::OTHER_CATEGORY;

/// Categorize a page URL
pub fn categorize(page_url: Option<&str>, mode: &CategoryMode) -> String {
    let Some(url) = page_url else {
        return OTHER_CATEGORY.to_string();
    };

    match mode {
        CategoryMode::FirstDirectory => first_directory(url),
        CategoryMode::Rules(rules) => match_rules(url, rules),
    }
}

/// Fourth `/`-delimited segment (the first path component of
/// `scheme://host/...`), or "Other" when there are no more than three
fn first_directory(url: &str) -> String {
    url.split('/')
        .nth(3)
        .unwrap_or(OTHER_CATEGORY)
        .to_string()
}

/// Name of the first rule whose regex occurs anywhere in the URL
fn match_rules(url: &str, rules: &[CategoryRule]) -> String {
    rules
        .iter()
        .find(|rule| rule.regex.is_match(url))
        .map(|rule| rule.name.clone())
        .unwrap_or_else(|| OTHER_CATEGORY.to_string())
}
