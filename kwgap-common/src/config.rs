//! Configuration loading and the immutable analysis configuration
//!
//! Two layers:
//! 1. **TOML bootstrap** (`TomlConfig`): optional file holding domain, rules,
//!    output folder and logging. Every field is optional; the command line
//!    overrides it field by field.
//! 2. **AnalysisConfig**: built once from the effective settings, validated,
//!    with all regular expressions compiled. It is passed by reference into
//!    the pipeline and never mutated.
//!
//! # Config file priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `KWGAP_CONFIG` environment variable
//! 3. `<platform config dir>/kwgap/config.toml`, if it exists
//! 4. None (built-in defaults)

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result, RuleKind};
use crate::rules::{parse_rule_pairs, RulePair};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "KWGAP_CONFIG";

/// Rule list as written in TOML: inline `"Label: Pattern, ..."` text or an
/// array of `{ label, pattern }` tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSource {
    Inline(String),
    Pairs(Vec<RulePair>),
}

impl RuleSource {
    /// Ordered rule pairs, parsing the inline form
    pub fn to_pairs(&self, kind: RuleKind) -> Result<Vec<RulePair>> {
        match self {
            RuleSource::Inline(text) => parse_rule_pairs(text, kind),
            RuleSource::Pairs(pairs) => {
                if let Some(bad) = pairs.iter().find(|p| p.label.trim().is_empty()) {
                    return Err(Error::ConfigFormat {
                        kind,
                        pair: format!("{}: {}", bad.label, bad.pattern),
                    });
                }
                Ok(pairs.clone())
            }
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Domain naming the rank column and the `<domain> (pages)` column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Category rules (ignored when `use_first_directory` is set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<RuleSource>,

    /// Categorize by first URL path segment instead of rules
    #[serde(default)]
    pub use_first_directory: bool,

    /// Keyword pattern rules (ignored when `skip_patterns` is set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<RuleSource>,

    /// Label every keyword "non brand"
    #[serde(default)]
    pub skip_patterns: bool,

    /// Folder receiving the output CSV files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve which config file to read, if any
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|path| path.exists())
}

/// `<platform config dir>/kwgap/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kwgap").join("config.toml"))
}

/// Load a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Write a TOML config atomically (temp file + rename, 0600 on Unix)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("toml.tmp");
    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// Category rule: name assigned when `regex` matches anywhere in the page URL
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub name: String,
    pub regex: Regex,
}

/// Keyword pattern rule: label assigned when `regex` matches the keyword
/// (case-insensitive)
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub regex: Regex,
    pub label: String,
}

/// How page URLs become categories
#[derive(Debug, Clone)]
pub enum CategoryMode {
    /// Ordered rules, first match wins
    Rules(Vec<CategoryRule>),
    /// First path component after the host
    FirstDirectory,
}

/// How keywords become pattern labels
#[derive(Debug, Clone)]
pub enum PatternMode {
    /// Ordered rules, first match wins
    Rules(Vec<PatternRule>),
    /// Every keyword is "non brand"
    Skip,
}

/// Immutable configuration for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    domain: String,
    categories: CategoryMode,
    patterns: PatternMode,
}

impl AnalysisConfig {
    /// Validate and assemble a configuration
    pub fn new(domain: impl Into<String>, categories: CategoryMode, patterns: PatternMode) -> Result<Self> {
        let domain = domain.into().trim().to_string();
        if domain.is_empty() {
            return Err(Error::Config("Domain name must not be empty".to_string()));
        }
        Ok(Self {
            domain,
            categories,
            patterns,
        })
    }

    /// Build from TOML settings, compiling every rule
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let domain = config
            .domain
            .clone()
            .ok_or_else(|| Error::Config("Domain name is not configured".to_string()))?;

        let categories = if config.use_first_directory {
            if config.categories.is_some() {
                warn!("Both category rules and use_first_directory given; using first directory");
            }
            CategoryMode::FirstDirectory
        } else {
            let pairs = match &config.categories {
                Some(source) => source.to_pairs(RuleKind::Category)?,
                None => Vec::new(),
            };
            if pairs.is_empty() {
                return Err(Error::Config(
                    "Category rules or use_first_directory must be given".to_string(),
                ));
            }
            CategoryMode::Rules(compile_category_rules(&pairs)?)
        };

        let patterns = if config.skip_patterns {
            if config.patterns.is_some() {
                warn!("Both keyword patterns and skip_patterns given; skipping patterns");
            }
            PatternMode::Skip
        } else {
            let pairs = match &config.patterns {
                Some(source) => source.to_pairs(RuleKind::Pattern)?,
                None => Vec::new(),
            };
            PatternMode::Rules(compile_pattern_rules(&pairs)?)
        };

        Self::new(domain, categories, patterns)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `<domain> (pages)` column name
    pub fn pages_column(&self) -> String {
        format!("{} (pages)", self.domain)
    }

    pub fn categories(&self) -> &CategoryMode {
        &self.categories
    }

    pub fn patterns(&self) -> &PatternMode {
        &self.patterns
    }
}

/// Compile category rules (case-sensitive search)
pub fn compile_category_rules(pairs: &[RulePair]) -> Result<Vec<CategoryRule>> {
    pairs
        .iter()
        .map(|pair| {
            let regex = Regex::new(&pair.pattern).map_err(|source| Error::InvalidPattern {
                kind: RuleKind::Category,
                label: pair.label.clone(),
                pattern: pair.pattern.clone(),
                source,
            })?;
            Ok(CategoryRule {
                name: pair.label.clone(),
                regex,
            })
        })
        .collect()
}

/// Compile keyword pattern rules (case-insensitive search)
pub fn compile_pattern_rules(pairs: &[RulePair]) -> Result<Vec<PatternRule>> {
    pairs
        .iter()
        .map(|pair| {
            let regex = RegexBuilder::new(&pair.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| Error::InvalidPattern {
                    kind: RuleKind::Pattern,
                    label: pair.label.clone(),
                    pattern: pair.pattern.clone(),
                    source,
                })?;
            Ok(PatternRule {
                regex,
                label: pair.label.clone(),
            })
        })
        .collect()
}
