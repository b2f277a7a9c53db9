//! Configuration
//!
//! TOML file listing the composites to compute and the FRED credentials:
//!
//! ```toml
//! log_level = "info"
//!
//! [fred]
//! api_key = "..."
//!
//! [[composites]]
//! label = "Information Technology"
//! tickers = [{ ticker = "AAPL", weight = 1.0 }, { ticker = "MSFT", weight = 1.0 }]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{VixError, VixResult, WeightedTicker};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VixConfig {
    /// Default log filter when RUST_LOG is unset
    pub log_level: Option<String>,
    #[serde(default)]
    pub fred: FredConfig,
    #[serde(default)]
    pub composites: Vec<CompositeConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FredConfig {
    /// Overridden by the FRED_API_KEY environment variable
    pub api_key: Option<String>,
}

/// One weighted basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeConfig {
    pub label: String,
    pub tickers: Vec<WeightedTicker>,
}

impl VixConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> VixResult<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            VixError::config(format!("Failed to read {:?}: {}", path.as_ref(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(s: &str) -> VixResult<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| VixError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VixResult<()> {
        let mut labels = HashSet::new();
        for composite in &self.composites {
            if composite.label.trim().is_empty() {
                return Err(VixError::config("composite label must not be empty"));
            }
            if !labels.insert(composite.label.as_str()) {
                return Err(VixError::config(format!(
                    "duplicate composite label '{}'",
                    composite.label
                )));
            }
            if composite.tickers.is_empty() {
                return Err(VixError::config(format!(
                    "composite '{}' has no tickers",
                    composite.label
                )));
            }
            if let Some(bad) = composite.tickers.iter().find(|t| !t.is_valid()) {
                return Err(VixError::config(format!(
                    "composite '{}': ticker {:?} needs a name and a positive weight (got {})",
                    composite.label, bad.ticker, bad.weight
                )));
            }
        }
        Ok(())
    }

    pub fn composite(&self, label: &str) -> Option<&CompositeConfig> {
        self.composites.iter().find(|c| c.label == label)
    }

    /// Every distinct ticker across all composites, in first-seen order
    pub fn all_tickers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.composites
            .iter()
            .flat_map(|c| c.tickers.iter())
            .filter(|t| seen.insert(t.ticker.clone()))
            .map(|t| t.ticker.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
log_level = "debug"

[fred]
api_key = "abc123"

[[composites]]
label = "Information Technology"
tickers = [
    { ticker = "AAPL", weight = 1.0 },
    { ticker = "MSFT", weight = 2.0 },
]

[[composites]]
label = "Energy"
tickers = [{ ticker = "XOM", weight = 1.0 }, { ticker = "AAPL", weight = 0.5 }]
"#;

    #[test]
    fn test_parse_config() {
        let config = VixConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.fred.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.composites.len(), 2);

        let tech = config.composite("Information Technology").unwrap();
        assert_eq!(tech.tickers[1], WeightedTicker::new("MSFT", 2.0));
        assert!(config.composite("Utilities").is_none());
        assert_eq!(config.all_tickers(), vec!["AAPL", "MSFT", "XOM"]);
    }

    #[test]
    fn test_minimal_config() {
        let config = VixConfig::from_toml_str("").unwrap();
        assert!(config.composites.is_empty());
        assert!(config.fred.api_key.is_none());
    }

    #[test]
    fn test_rejects_bad_weight() {
        let text = r#"
[[composites]]
label = "Bad"
tickers = [{ ticker = "AAPL", weight = 0.0 }]
"#;
        assert!(matches!(VixConfig::from_toml_str(text), Err(VixError::Config(_))));
    }

    #[test]
    fn test_rejects_duplicate_label() {
        let text = r#"
[[composites]]
label = "A"
tickers = [{ ticker = "AAPL", weight = 1.0 }]

[[composites]]
label = "A"
tickers = [{ ticker = "MSFT", weight = 1.0 }]
"#;
        assert!(VixConfig::from_toml_str(text).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("vix.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = VixConfig::load(&path).unwrap();
        assert_eq!(config.composites[1].label, "Energy");

        assert!(VixConfig::load(temp_dir.path().join("missing.toml")).is_err());
    }
}
