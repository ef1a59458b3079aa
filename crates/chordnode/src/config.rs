use anyhow::{Context, Result};
use chordring_core::{Key, NodeId, RingConfig, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ring: RingConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(skip)]
    config_file_path: PathBuf,
}

/// The fixed sequence of calls issued by the scenario driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Nodes joined before anything else, in order
    pub nodes: Vec<NodeId>,
    /// Keys stored once the initial nodes are up
    #[serde(default)]
    pub keys: Vec<KeyEntry>,
    #[serde(default)]
    pub lookups: Vec<LookupConfig>,
    /// Membership changes applied after the lookups
    #[serde(default)]
    pub events: Vec<MembershipEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub key: Key,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    pub start: NodeId,
    pub key: Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum MembershipEvent {
    Join(NodeId),
    Leave(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
    /// Print the ASCII ring at the end of the run
    #[serde(default = "default_true")]
    pub visualize: bool,
    /// Include finger tables in node listings
    #[serde(default)]
    pub fingers: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit log lines as JSON objects
    #[serde(default)]
    pub json: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            nodes: vec![3, 10, 20, 27],
            keys: [(5, "A"), (12, "B"), (25, "C"), (30, "D")]
                .into_iter()
                .map(|(key, value)| KeyEntry {
                    key,
                    value: value.to_string(),
                })
                .collect(),
            lookups: vec![LookupConfig { start: 3, key: 25 }],
            events: vec![MembershipEvent::Join(15), MembershipEvent::Leave(10)],
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            visualize: true,
            fingers: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ring: RingConfig::default(),
            scenario: ScenarioConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
            config_file_path: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found: {}\nRun with --init to create a new configuration",
                config_path.display()
            );
        }

        let contents =
            fs::read_to_string(&config_path).context("Failed to read configuration file")?;

        let mut config: Config =
            serde_yaml::from_str(&contents).context("Failed to parse configuration file")?;
        config.ring.validate().context("Invalid ring configuration")?;

        config.config_file_path = config_path;

        Ok(config)
    }

    /// Load the given file, the default file if present, or built-in defaults
    pub fn load_or_default(config_path: Option<PathBuf>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load(Some(path)),
            None if Self::default_config_path().exists() => Self::load(None),
            None => Ok(Self::default()),
        }
    }

    /// Write the default configuration to disk
    pub fn create_default(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(Self::default_config_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Config {
            config_file_path: config_path.clone(),
            ..Config::default()
        };

        let yaml = serde_yaml::to_string(&config)?;
        fs::write(&config_path, yaml)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        Ok(config)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_file_path
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chordnode")
            .join("config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_is_demo() {
        let config = Config::default();
        assert_eq!(config.ring.id_bits, 5);
        assert_eq!(config.ring.replication_factor, 2);
        assert_eq!(config.scenario.nodes, vec![3, 10, 20, 27]);
        assert_eq!(config.scenario.keys.len(), 4);
        assert_eq!(
            config.scenario.events,
            vec![MembershipEvent::Join(15), MembershipEvent::Leave(10)]
        );
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = "scenario:\n  nodes: [1, 5, 9, 12]\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.scenario.nodes, vec![1, 5, 9, 12]);
        assert!(config.scenario.keys.is_empty());
        assert_eq!(config.ring, RingConfig::default());
        assert_eq!(config.report.format, ReportFormat::Text);
        assert!(config.report.visualize);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_events() {
        let yaml = r#"
scenario:
  nodes: [3]
  events:
    - action: join
      id: 15
    - action: leave
      id: 3
report:
  format: json
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.scenario.events,
            vec![MembershipEvent::Join(15), MembershipEvent::Leave(3)]
        );
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
