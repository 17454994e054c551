//! Shared fixtures for kwgap-an integration tests
//!
//! Two small exports for `example.com` that overlap on "shoes".

#![allow(dead_code)]

use kwgap_common::config::{RuleSource, TomlConfig};
use kwgap_common::{AnalysisConfig, Table};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub const DOMAIN: &str = "example.com";
pub const PAGES: &str = "example.com (pages)";

/// Settings with inline rules, as they would come from the command line
pub fn settings(categories: &str, patterns: &str) -> TomlConfig {
    TomlConfig {
        domain: Some(DOMAIN.to_string()),
        categories: Some(RuleSource::Inline(categories.to_string())),
        patterns: Some(RuleSource::Inline(patterns.to_string())),
        ..TomlConfig::default()
    }
}

pub fn shop_blog_config() -> AnalysisConfig {
    AnalysisConfig::from_toml(&settings("Shop: /shop/, Blog: /blog/", "Brand: nike"))
        .expect("fixture config is valid")
}

/// First export: "shoes" ranked 5, plus rows in every other band
pub fn table_a() -> Table {
    Table::from_rows(
        "a.csv",
        &["Keyword", "Search Volume", DOMAIN, PAGES, "Competition"],
        vec![
            row(&["shoes", "120", "5", "https://example.com/shop/shoes", "0.5"]),
            row(&["nike socks", "300", "7", "https://example.com/shop/socks", "0.1"]),
            row(&["blog post", "50", "15", "https://example.com/blog/post", ""]),
            row(&["about us", "10", "40", "https://example.com/about", ""]),
        ],
    )
}

/// Second export: "shoes" ranked 2, and a row with an unreadable volume
pub fn table_b() -> Table {
    Table::from_rows(
        "b.csv",
        &["Keyword", "Search Volume", DOMAIN, PAGES, "CPC"],
        vec![
            row(&["shoes", "80", "2", "https://example.com/shop/shoes", "1.2"]),
            row(&["hats", "n/a", "12", "https://example.com/shop/hats", "0.3"]),
        ],
    )
}

/// Cells as the CSV reader produces them: text, or null when empty
pub fn row(cells: &[&str]) -> Vec<Value> {
    cells
        .iter()
        .map(|c| if c.is_empty() { Value::Null } else { json!(c) })
        .collect()
}

/// Column of `table` as displayed text
pub fn column_text(table: &Table, column: &str) -> Vec<String> {
    table
        .column_values(column)
        .expect("column exists")
        .map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect()
}

/// Write a CSV file verbatim and return its path
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture csv");
    path
}
