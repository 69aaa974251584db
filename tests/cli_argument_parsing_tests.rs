//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are properly parsed into
//! commands and layered over the configuration file and defaults.

use clap::Parser;
use residency_allocator::types::config::{CliArgs, Command};
use residency_allocator::{AutosavePolicy, EngineConfig, HouseRemovalPolicy};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Test that no subcommand means the summary view
#[test]
fn test_defaults_without_arguments() {
    let cli_args = CliArgs::try_parse_from(["residency-allocator"]).unwrap();

    assert!(cli_args.command.is_none());
    assert!(!cli_args.verbose);
    assert!(!cli_args.dry_run);

    let config = EngineConfig::from_cli_args(&cli_args).unwrap();
    assert_eq!(config, EngineConfig::default());
}

/// Test parsing of the admit command
#[test]
fn test_admit_command_parsing() {
    let cli_args = CliArgs::try_parse_from([
        "residency-allocator",
        "admit",
        "--surname",
        "Rossi",
        "--given-name",
        "Marco",
        "--nationality",
        "Italien",
        "--prefer",
        "Maison de l'Italie",
    ])
    .unwrap();

    assert_eq!(
        cli_args.command,
        Some(Command::Admit {
            surname: "Rossi".to_string(),
            given_name: "Marco".to_string(),
            nationality: "Italien".to_string(),
            prefer: Some("Maison de l'Italie".to_string()),
        })
    );
}

/// Test that admit requires its identity fields
#[test]
fn test_admit_requires_nationality() {
    let result = CliArgs::try_parse_from([
        "residency-allocator",
        "admit",
        "--surname",
        "Rossi",
        "--given-name",
        "Marco",
    ]);
    assert!(result.is_err());
}

/// Test comma separated room capacities
#[test]
fn test_add_house_capacities() {
    let cli_args = CliArgs::try_parse_from([
        "residency-allocator",
        "add-house",
        "--name",
        "Maison du Brésil",
        "--nationality",
        "Brésilien",
        "--capacities",
        "1,2,1",
    ])
    .unwrap();

    match cli_args.command {
        Some(Command::AddHouse { name, director, nationality, capacities, .. }) => {
            assert_eq!(name, "Maison du Brésil");
            assert_eq!(director, "");
            assert_eq!(nationality.as_deref(), Some("Brésilien"));
            assert_eq!(capacities, vec![1, 2, 1]);
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let no_capacities =
        CliArgs::try_parse_from(["residency-allocator", "add-house", "--name", "Maison"]).unwrap();
    assert!(matches!(
        no_capacities.command,
        Some(Command::AddHouse { ref capacities, .. }) if capacities.is_empty()
    ));
}

/// Test the listing and removal commands
#[test]
fn test_listing_and_removal_commands() {
    let students = CliArgs::try_parse_from([
        "residency-allocator",
        "students",
        "--house",
        "Maison du Japon",
        "--descending",
    ])
    .unwrap();
    assert_eq!(
        students.command,
        Some(Command::Students { house: Some("Maison du Japon".to_string()), descending: true })
    );

    let remove =
        CliArgs::try_parse_from(["residency-allocator", "remove-house", "Maison du Japon"]).unwrap();
    assert_eq!(remove.command, Some(Command::RemoveHouse { name: "Maison du Japon".to_string() }));

    let withdraw = CliArgs::try_parse_from(["residency-allocator", "withdraw", "STU_1234"]).unwrap();
    assert_eq!(withdraw.command, Some(Command::Withdraw { student: "STU_1234".to_string() }));
}

/// Test policy flags and their validation
#[test]
fn test_policy_flags() {
    let cli_args = CliArgs::try_parse_from([
        "residency-allocator",
        "--autosave",
        "manual",
        "--removal-policy",
        "reassign",
        "--snapshot",
        "/tmp/ciup.json",
        "houses",
    ])
    .unwrap();

    let config = EngineConfig::from_cli_args(&cli_args).unwrap();
    assert_eq!(config.autosave, AutosavePolicy::Manual);
    assert_eq!(config.removal_policy, HouseRemovalPolicy::Reassign);
    assert_eq!(config.snapshot_path, PathBuf::from("/tmp/ciup.json"));
    assert_eq!(cli_args.command, Some(Command::Houses));

    assert!(CliArgs::try_parse_from(["residency-allocator", "--autosave", "sometimes"]).is_err());
    assert!(CliArgs::try_parse_from(["residency-allocator", "--removal-policy", "evict"]).is_err());
}

/// Test that CLI flags override the configuration file
#[test]
fn test_config_file_layering() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    writeln!(
        file,
        r#"{{"snapshot_path": "from-file.json", "removal_policy": "reassign", "new_house_room_count": 10}}"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let from_file = CliArgs::try_parse_from(["residency-allocator", "--config", &path]).unwrap();
    let config = EngineConfig::from_cli_args(&from_file).unwrap();
    assert_eq!(config.snapshot_path, PathBuf::from("from-file.json"));
    assert_eq!(config.removal_policy, HouseRemovalPolicy::Reassign);
    assert_eq!(config.new_house_room_count, 10);
    // Unset fields keep their defaults
    assert_eq!(config.autosave, AutosavePolicy::AfterEachMutation);

    let overridden = CliArgs::try_parse_from([
        "residency-allocator",
        "--config",
        &path,
        "--snapshot",
        "from-cli.json",
        "--removal-policy",
        "forbid",
    ])
    .unwrap();
    let config = EngineConfig::from_cli_args(&overridden).unwrap();
    assert_eq!(config.snapshot_path, PathBuf::from("from-cli.json"));
    assert_eq!(config.removal_policy, HouseRemovalPolicy::Forbid);
    assert_eq!(config.new_house_room_count, 10);
}

/// Test configuration file errors
#[test]
fn test_config_file_errors() {
    let missing = CliArgs::try_parse_from(["residency-allocator", "--config", "/nonexistent/config.json"])
        .unwrap();
    assert!(EngineConfig::from_cli_args(&missing).is_err());

    let toml = NamedTempFile::new().unwrap();
    let path = toml.path().with_extension("toml");
    std::fs::write(&path, "snapshot_path = 'x'").unwrap();
    let unsupported =
        CliArgs::try_parse_from(["residency-allocator", "--config", path.to_str().unwrap()]).unwrap();
    assert!(EngineConfig::from_cli_args(&unsupported).is_err());
    std::fs::remove_file(&path).unwrap();
}

/// Test that invalid file values are caught by validation
#[test]
fn test_validation_of_loaded_config() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    writeln!(file, r#"{{"new_house_room_capacity": 0}}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let cli_args = CliArgs::try_parse_from(["residency-allocator", "--config", &path]).unwrap();
    let config = EngineConfig::from_cli_args(&cli_args).unwrap();

    assert!(config.validate().is_err());
}
