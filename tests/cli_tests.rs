//! CLI integration tests
//!
//! Runs the binary against a temporary data directory using assert_cmd.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Command isolated from the user's home, config and store.
fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("persona-community").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("PERSONA_DATA_DIR", home.path().join("data"))
        .env_remove("PERSONA_CONFIG")
        .env_remove("PERSONA_STORE_FILE")
        .env_remove("PERSONA_DEFAULT_SIZE")
        .env_remove("RUST_LOG")
        .arg("--quiet");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn seed(home: &TempDir) {
    cli(home)
        .args(["persona", "seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 4 persona(s)"));
}

fn generate(home: &TempDir, size: &str) -> Value {
    json_output(cli(home).args(["community", "generate", "--name", "Riverside", "--size", size]))
}

// ─────────────────────────────────────────────────────────────────
// Help, Version and Config
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("community"))
        .stdout(predicate::str::contains("persona"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("persona-community"))
        .stdout(predicate::str::contains("Target:"));
}

#[test]
fn test_config_show_default() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[storage]"))
        .stdout(predicate::str::contains("[logging]"))
        .stdout(predicate::str::contains("default_size = 10"));
}

#[test]
fn test_config_validate_default() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("store.json"));
}

#[test]
fn test_config_validate_rejects_bad_level() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "validate", "--config"])
        .arg(common::fixture_path("invalid_config.toml"))
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E102"));
}

#[test]
fn test_missing_config_file() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "show", "--config", "/nonexistent/persona.toml"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_config_init_writes_loadable_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("conf").join("persona.toml");

    cli(&home)
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));
    assert!(path.exists());

    cli(&home)
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli(&home)
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success();
}

// ─────────────────────────────────────────────────────────────────
// Personas
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_persona_seed_and_list() {
    let home = TempDir::new().unwrap();
    seed(&home);

    cli(&home)
        .args(["persona", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Historian"))
        .stdout(predicate::str::contains("Urban Planner"));

    cli(&home)
        .args(["persona", "seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 0 persona(s)"));
}

#[test]
fn test_persona_seed_only() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["persona", "seed", "--only", "historian"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1 persona(s)"))
        .stdout(predicate::str::contains("Historian"));

    cli(&home)
        .args(["persona", "seed", "--only", "astronaut"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("persona not found: astronaut"));

    cli(&home)
        .args(["persona", "seed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 3 persona(s)"));
}

#[test]
fn test_persona_add() {
    let home = TempDir::new().unwrap();
    let persona = json_output(cli(&home).args([
        "persona", "add", "--name", "Chef", "--topic", "cooking", "--prompt", "You cook.", "--tags", "food",
    ]));
    assert_eq!(persona["name"], "Chef");
    assert_eq!(persona["tags"][0], "food");
    assert!(!persona["id"].as_str().unwrap().is_empty());
}

// ─────────────────────────────────────────────────────────────────
// Communities
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_generate_without_personas_fails() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["community", "generate", "--name", "Empty", "--size", "3"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("persona seed"));
}

#[test]
fn test_generate_show_and_stats() {
    let home = TempDir::new().unwrap();
    seed(&home);

    let community = generate(&home, "5");
    assert_eq!(community["size"], 5);
    assert_eq!(community["member_ids"].as_array().unwrap().len(), 5);
    assert_eq!(community["max_members"], 10);
    assert_eq!(community["min_members"], 2);
    let id = community["id"].as_str().unwrap().to_string();

    let shown = json_output(cli(&home).args(["community", "show", id.as_str()]));
    assert_eq!(shown["member_ids"], community["member_ids"]);

    let stats = json_output(cli(&home).args(["community", "stats", id.as_str()]));
    assert_eq!(stats["total_members"], 5);
    let diversity = stats["diversity_index"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&diversity));

    cli(&home)
        .args(["community", "stats", id.as_str(), "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Members:     5"))
        .stdout(predicate::str::contains("Diversity:"));

    cli(&home)
        .args(["community", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()));
}

#[test]
fn test_generate_uses_profile_file() {
    let home = TempDir::new().unwrap();
    seed(&home);

    let community = json_output(
        cli(&home)
            .args(["community", "generate", "--name", "Abroad", "--size", "4", "--profile"])
            .arg(common::fixture_path("generation.toml")),
    );
    assert_eq!(community["generation_config"]["location_constraint"]["type"], "country");

    let member = community["member_ids"][0].as_str().unwrap().to_string();
    let identity = json_output(cli(&home).args(["identity", "show", member.as_str()]));
    let demographics = &identity["rich_attributes"]["demographics"];
    let age = demographics["age"].as_u64().unwrap();
    assert!((30..=50).contains(&age));
    let country = demographics["location"]["country"].as_str().unwrap();
    assert!(["Kenya", "Chile", "Norway"].contains(&country));
    assert_eq!(demographics["location"]["urban"], true);
}

#[test]
fn test_generate_location_flags_override_defaults() {
    let home = TempDir::new().unwrap();
    seed(&home);

    let community = json_output(cli(&home).args([
        "community",
        "generate",
        "--name",
        "Andes",
        "--size",
        "3",
        "--location-type",
        "country",
        "--locations",
        "Chile,Peru",
    ]));
    let constraint = &community["generation_config"]["location_constraint"];
    assert_eq!(constraint["type"], "country");
    assert_eq!(constraint["locations"][1], "Peru");

    for member in community["member_ids"].as_array().unwrap() {
        let identity = json_output(cli(&home).args(["identity", "show", member.as_str().unwrap()]));
        let country = identity["rich_attributes"]["demographics"]["location"]["country"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(country == "Chile" || country == "Peru");
    }
}

#[test]
fn test_identity_list_filters_by_leaning() {
    let home = TempDir::new().unwrap();
    seed(&home);
    let community = generate(&home, "6");

    let first = community["member_ids"][0].as_str().unwrap().to_string();
    let identity = json_output(cli(&home).args(["identity", "show", first.as_str()]));
    let leaning = identity["rich_attributes"]["political_social"]["political_leaning"]
        .as_str()
        .unwrap()
        .to_string();

    let output = cli(&home)
        .args(["identity", "list", "--leaning", leaning.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let listed = String::from_utf8_lossy(&output.stdout);
    assert!(listed.contains(first.as_str()));

    let all = cli(&home).args(["identity", "list"]).output().unwrap();
    assert!(String::from_utf8_lossy(&all.stdout).lines().count() >= listed.lines().count());
}

#[test]
fn test_generate_uses_default_size() {
    let home = TempDir::new().unwrap();
    seed(&home);

    let community = json_output(
        cli(&home)
            .env("PERSONA_DEFAULT_SIZE", "3")
            .args(["community", "generate", "--name", "Defaulted"]),
    );
    assert_eq!(community["size"], 3);
}

#[test]
fn test_remove_member_below_minimum_fails() {
    let home = TempDir::new().unwrap();
    seed(&home);

    let community = generate(&home, "2");
    let id = community["id"].as_str().unwrap().to_string();
    let first = community["member_ids"][0].as_str().unwrap().to_string();
    let second = community["member_ids"][1].as_str().unwrap().to_string();

    let after = json_output(cli(&home).args(["community", "remove-member", id.as_str(), first.as_str()]));
    assert_eq!(after["size"], 1);

    cli(&home)
        .args(["community", "remove-member", id.as_str(), second.as_str()])
        .assert()
        .failure()
        .code(50)
        .stderr(predicate::str::contains("E503"));

    cli(&home)
        .args(["community", "add-member", id.as_str(), first.as_str()])
        .assert()
        .success();
}

#[test]
fn test_update_limits() {
    let home = TempDir::new().unwrap();
    seed(&home);

    let community = generate(&home, "4");
    let id = community["id"].as_str().unwrap().to_string();

    let updated = json_output(cli(&home).args([
        "community",
        "update",
        id.as_str(),
        "--name",
        "Hillside",
        "--max-members",
        "20",
    ]));
    assert_eq!(updated["name"], "Hillside");
    assert_eq!(updated["max_members"], 20);

    cli(&home)
        .args(["community", "update", id.as_str(), "--min-members", "50"])
        .assert()
        .failure()
        .code(30);
}

#[test]
fn test_show_unknown_community() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["community", "show", "no-such-id"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("community not found"));
}
