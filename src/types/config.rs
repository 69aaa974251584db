//! Configuration structures for the residency allocator
//!
//! This module contains the engine configuration structure, the command line
//! surface of the binary and the validation logic that ties them together.

use super::{AutosavePolicy, HouseRemovalPolicy};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default room layout used when a house is created without capacities
pub mod room_defaults {
    /// Number of rooms created for a new house
    pub const ROOM_COUNT: usize = 100;

    /// Capacity of each room created for a new house
    pub const ROOM_CAPACITY: u32 = 1;
}

/// Default snapshot slot, relative to the working directory
pub const DEFAULT_SNAPSHOT_PATH: &str = "residency.json";

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "residency-allocator",
    version,
    about = "Residency Allocator - Assigns students to houses, rooms and waitlists",
    long_about = "Manages residency for a multi-house student complex: nationality and equity based house selection, room placement, FIFO waitlists and automatic promotion when a room frees up. State is kept in a JSON snapshot between runs.

EXAMPLES:
    # Show a summary of the complex (bootstraps the default dataset on first run)
    residency-allocator

    # Admit a student, letting the policy pick the house
    residency-allocator admit --surname Lefebvre --given-name Anne --nationality Français

    # Admit a student into a preferred house
    residency-allocator admit --surname Rossi --given-name Marco --nationality Italien --prefer \"Maison de l'Italie\"

    # Withdraw a student (the head of the house waitlist is promoted)
    residency-allocator withdraw STU_0f8fad5bd9cb469fa16570867728950e

    # Use a different snapshot and reassign residents when removing a house
    residency-allocator --snapshot /tmp/ciup.json --removal-policy reassign remove-house \"Maison du Japon\"

    # Generate configuration template
    residency-allocator --print-config > my-config.json

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Snapshot file path
    #[arg(
        long,
        help = "Snapshot file path",
        long_help = "Path of the JSON snapshot holding the complex between runs. Default: residency.json"
    )]
    pub snapshot: Option<String>,

    /// Autosave policy
    #[arg(
        long,
        help = "Autosave policy (after-each-mutation or manual)",
        long_help = "When to write the snapshot. 'after-each-mutation' saves after every successful change, 'manual' only saves on exit of mutating commands. Default: after-each-mutation"
    )]
    pub autosave: Option<AutosavePolicy>,

    /// House removal policy
    #[arg(
        long,
        help = "House removal policy (forbid or reassign)",
        long_help = "What to do with residents and waitlisted students of a removed house. 'forbid' refuses to remove a non-empty house, 'reassign' routes them through the assignment policy again. Default: forbid"
    )]
    pub removal_policy: Option<HouseRemovalPolicy>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without touching the snapshot
    #[arg(long, help = "Validate configuration without touching the snapshot")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,

    /// Command to run (defaults to `summary`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Operations exposed by the binary
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print occupancy figures for the whole complex
    Summary,

    /// List residential houses with their occupancy
    Houses,

    /// List students, optionally restricted to one house
    Students {
        /// Only list residents and waitlist of this house
        #[arg(long)]
        house: Option<String>,

        /// Sort Z to A instead of A to Z
        #[arg(long)]
        descending: bool,
    },

    /// Admit a new student and route them to a house
    Admit {
        /// Family name
        #[arg(long)]
        surname: String,

        /// Given name
        #[arg(long)]
        given_name: String,

        /// Nationality label, matched against house nationalities
        #[arg(long)]
        nationality: String,

        /// Preferred house name; bypasses the nationality and equity rules
        #[arg(long)]
        prefer: Option<String>,
    },

    /// Withdraw a student from the complex
    Withdraw {
        /// Student identifier as printed by `students`
        student: String,
    },

    /// Add a residential house
    AddHouse {
        /// House name
        #[arg(long)]
        name: String,

        /// Director name
        #[arg(long, default_value = "")]
        director: String,

        /// Nationality label; leave unset for a house without one
        #[arg(long)]
        nationality: Option<String>,

        /// Address
        #[arg(long, default_value = "")]
        location: String,

        /// Comma separated room capacities, one entry per room
        #[arg(long, value_delimiter = ',')]
        capacities: Vec<u32>,
    },

    /// Remove a residential house by name
    RemoveHouse {
        /// House name (case-insensitive)
        name: String,
    },

    /// List scheduled events of every house
    Events,

    /// Replace the complex with the default dataset
    Reset,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Snapshot file path
    pub snapshot_path: Option<PathBuf>,

    /// When to write the snapshot
    pub autosave: Option<AutosavePolicy>,

    /// Handling of residents when a house is removed
    pub removal_policy: Option<HouseRemovalPolicy>,

    /// Number of rooms for a house created without capacities
    pub new_house_room_count: Option<usize>,

    /// Capacity of each room for a house created without capacities
    pub new_house_room_capacity: Option<u32>,

    /// Directory for rolling log files
    pub log_directory: Option<PathBuf>,
}

/// Configuration for the allocation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Snapshot file path
    pub snapshot_path: PathBuf,

    /// When to write the snapshot
    pub autosave: AutosavePolicy,

    /// Handling of residents when a house is removed
    pub removal_policy: HouseRemovalPolicy,

    /// Number of rooms for a house created without capacities
    pub new_house_room_count: usize,

    /// Capacity of each room for a house created without capacities
    pub new_house_room_capacity: u32,

    /// Directory for rolling log files, console only when unset
    pub log_directory: Option<PathBuf>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for engine configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Snapshot path is empty
    #[error("Snapshot path must not be empty")]
    EmptySnapshotPath,

    /// Default room count is invalid
    #[error("Default room count must be greater than 0, got {0}")]
    InvalidRoomCount(usize),

    /// Default room capacity is invalid
    #[error("Default room capacity must be greater than 0, got {0}")]
    InvalidRoomCapacity(u32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            autosave: AutosavePolicy::default(),
            removal_policy: HouseRemovalPolicy::default(),
            new_house_room_count: room_defaults::ROOM_COUNT,
            new_house_room_capacity: room_defaults::ROOM_CAPACITY,
            log_directory: None,
        }
    }
}

impl EngineConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: &CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        config.apply_cli_overrides(args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            snapshot_path: config_file.snapshot_path.unwrap_or(defaults.snapshot_path),
            autosave: config_file.autosave.unwrap_or(defaults.autosave),
            removal_policy: config_file.removal_policy.unwrap_or(defaults.removal_policy),
            new_house_room_count: config_file
                .new_house_room_count
                .unwrap_or(defaults.new_house_room_count),
            new_house_room_capacity: config_file
                .new_house_room_capacity
                .unwrap_or(defaults.new_house_room_capacity),
            log_directory: config_file.log_directory.or(defaults.log_directory),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(value) = &args.snapshot {
            self.snapshot_path = PathBuf::from(value);
        }
        if let Some(value) = args.autosave {
            self.autosave = value;
        }
        if let Some(value) = args.removal_policy {
            self.removal_policy = value;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.snapshot_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptySnapshotPath);
        }

        if self.new_house_room_count == 0 {
            return Err(ConfigValidationError::InvalidRoomCount(self.new_house_room_count));
        }

        if self.new_house_room_capacity == 0 {
            return Err(ConfigValidationError::InvalidRoomCapacity(
                self.new_house_room_capacity,
            ));
        }

        Ok(())
    }

    /// Room capacities used for a house created without an explicit list
    pub fn default_room_layout(&self) -> Vec<u32> {
        vec![self.new_house_room_capacity; self.new_house_room_count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();

        assert_eq!(config.snapshot_path, PathBuf::from("residency.json"));
        assert_eq!(config.autosave, AutosavePolicy::AfterEachMutation);
        assert_eq!(config.removal_policy, HouseRemovalPolicy::Forbid);
        assert_eq!(config.new_house_room_count, 100);
        assert_eq!(config.new_house_room_capacity, 1);
        assert!(config.log_directory.is_none());
    }

    #[test]
    fn test_default_room_layout() {
        let mut config = EngineConfig::default();
        config.new_house_room_count = 3;
        config.new_house_room_capacity = 2;

        assert_eq!(config.default_room_layout(), vec![2, 2, 2]);
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;
        use tempfile::Builder;

        // Create a temporary config file with .json extension
        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let config_json = r#"{
            "snapshot_path": "/var/lib/ciup/state.json",
            "autosave": "manual",
            "new_house_room_count": 12
        }"#;

        temp_file.write_all(config_json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = EngineConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("/var/lib/ciup/state.json"));
        assert_eq!(config.autosave, AutosavePolicy::Manual);
        assert_eq!(config.new_house_room_count, 12);
        // Missing fields fall back to defaults
        assert_eq!(config.removal_policy, HouseRemovalPolicy::Forbid);
        assert_eq!(config.new_house_room_capacity, 1);
    }

    #[test]
    fn test_config_file_missing() {
        match EngineConfig::from_file("/definitely/not/here.json") {
            Err(ConfigError::FileNotFound(path)) => assert!(path.contains("not/here.json")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_file_unsupported_extension() {
        let temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();

        match EngineConfig::from_file(temp_file.path()) {
            Err(ConfigError::UnsupportedFormat(ext)) => assert_eq!(ext, "toml"),
            other => panic!("Expected UnsupportedFormat error, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::try_parse_from([
            "residency-allocator",
            "--snapshot",
            "other.json",
            "--removal-policy",
            "reassign",
        ])
        .unwrap();

        let config = EngineConfig::from_cli_args(&args).unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("other.json"));
        assert_eq!(config.removal_policy, HouseRemovalPolicy::Reassign);
        // Default values should remain for non-overridden fields
        assert_eq!(config.autosave, AutosavePolicy::AfterEachMutation);
    }

    #[test]
    fn test_cli_overrides_file() {
        use std::io::Write;

        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file
            .write_all(br#"{ "autosave": "manual", "snapshot_path": "from-file.json" }"#)
            .unwrap();
        temp_file.flush().unwrap();

        let config_path = temp_file.path().to_string_lossy().to_string();
        let args = CliArgs::try_parse_from([
            "residency-allocator",
            "--config",
            config_path.as_str(),
            "--autosave",
            "after-each-mutation",
        ])
        .unwrap();

        let config = EngineConfig::from_cli_args(&args).unwrap();
        assert_eq!(config.autosave, AutosavePolicy::AfterEachMutation);
        assert_eq!(config.snapshot_path, PathBuf::from("from-file.json"));
    }

    #[test]
    fn test_engine_config_validation_success() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_config_validation_errors() {
        let mut config = EngineConfig::default();
        config.snapshot_path = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptySnapshotPath)
        ));

        let mut config = EngineConfig::default();
        config.new_house_room_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidRoomCount(0))
        ));

        let mut config = EngineConfig::default();
        config.new_house_room_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidRoomCapacity(0))
        ));
    }

    #[test]
    fn test_config_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");

        let mut config = EngineConfig::default();
        config.removal_policy = HouseRemovalPolicy::Reassign;
        config.save_to_file(&path).unwrap();

        let reloaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_print_json_contains_policies() {
        let json = EngineConfig::default().print_json().unwrap();
        assert!(json.contains("\"autosave\": \"after-each-mutation\""));
        assert!(json.contains("\"removal_policy\": \"forbid\""));
    }
}
