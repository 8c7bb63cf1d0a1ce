//! Integration tests for the hackreg CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd, always
//! against the offline backend.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CREATE_TEAM: &str = r#"name: Ada
lastname: Lovelace
email: ada@example.com
phone: "+51999999999"
university: UNI
linkedin: https://linkedin.com/in/ada
github: https://github.com/ada
experience: Avanzado
expertise: Backend
teamChoice: Crear nuevo equipo
teamName: Rustaceans
teamDescription: Un copiloto para voluntarios de la comunidad
"#;

const JOIN_TEAM: &str = r#"name: Grace
lastname: Hopper
email: grace@example.com
phone: "+51988888888"
university: PUCP
linkedin: https://linkedin.com/in/grace
experience: Experto
expertise: Data Science
teamChoice: Unirme a equipo existente
existingTeam: Byte Me
"#;

const SPONSOR: &str = r#"name: Ferris Labs
email: contacto@ferris.dev
contact_name: Carla
contact_lastname: Rojas
contact_phone: "+51 977 777 777"
plan: Golden - Aliado Formador (S/ 450)
"#;

/// Helper to get an offline hackreg command isolated from any local config
fn hackreg(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hackreg").unwrap();
    cmd.current_dir(tmp.path())
        .env_remove("HACKREG_API_URL")
        .env_remove("HACKREG_OFFLINE")
        .env_remove("HACKREG_TIMEOUT_SECS")
        .arg("--offline")
        .arg("--config")
        .arg(tmp.path().join("hackreg.yaml"));
    cmd
}

/// Helper to write an answers file into the temp directory
fn answers_file(tmp: &TempDir, contents: &str) -> PathBuf {
    let path = tmp.path().join("answers.yaml");
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Basic CLI
// ============================================================================

#[test]
fn test_help_displays() {
    Command::cargo_bin("hackreg")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("registration"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("sponsor"));
}

#[test]
fn test_version_displays() {
    Command::cargo_bin("hackreg")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hackreg"));
}

#[test]
fn test_unknown_command_fails() {
    Command::cargo_bin("hackreg")
        .unwrap()
        .arg("enroll")
        .assert()
        .failure();
}

// ============================================================================
// register
// ============================================================================

#[test]
fn test_register_create_team() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, CREATE_TEAM);

    hackreg(&tmp)
        .arg("register")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Felicitaciones, Ada"))
        .stdout(predicate::str::contains("Equipo creado: Rustaceans"))
        .stdout(predicate::str::contains("Código de registro"));
}

#[test]
fn test_register_join_team() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, JOIN_TEAM);

    hackreg(&tmp)
        .arg("register")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Felicitaciones, Grace"))
        .stdout(predicate::str::contains("Equipo creado").not());
}

#[test]
fn test_register_json_receipt() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, CREATE_TEAM);

    let output = hackreg(&tmp)
        .args(["--format", "json", "register", "--answers"])
        .arg(&answers)
        .output()
        .unwrap();
    assert!(output.status.success());

    let receipt: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(receipt["name"], "Ada");
    assert_eq!(receipt["email"], "ada@example.com");
    assert_eq!(receipt["team_name"], "Rustaceans");
    assert!(receipt["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn test_register_missing_name_is_blocked() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, &CREATE_TEAM.replace("name: Ada\n", ""));

    hackreg(&tmp)
        .arg("register")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("field required"));
}

#[test]
fn test_register_reserved_email_conflicts() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, &CREATE_TEAM.replace("ada@example.com", "test@example.com"));

    hackreg(&tmp)
        .arg("register")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Este email ya está registrado"));
}

#[test]
fn test_register_without_tty_needs_answers() {
    let tmp = TempDir::new().unwrap();

    hackreg(&tmp)
        .arg("register")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--answers"));
}

#[test]
fn test_register_missing_answers_file() {
    let tmp = TempDir::new().unwrap();

    hackreg(&tmp)
        .args(["register", "--answers", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read answers file"));
}

#[test]
fn test_event_name_from_local_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("hackreg.yaml"),
        "event_name: Hack Night Lima\ncommunity_url: https://chat.example.com/hack\n",
    )
    .unwrap();
    let answers = answers_file(&tmp, JOIN_TEAM);

    hackreg(&tmp)
        .arg("register")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hack Night Lima"))
        .stdout(predicate::str::contains("https://chat.example.com/hack"));
}

// ============================================================================
// sponsor
// ============================================================================

#[test]
fn test_sponsor_registration() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, SPONSOR);

    hackreg(&tmp)
        .arg("sponsor")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ferris Labs"))
        .stdout(predicate::str::contains("Gracias Carla"))
        .stdout(predicate::str::contains("Golden"));
}

#[test]
fn test_sponsor_unknown_plan_is_blocked() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, &SPONSOR.replace("Golden - Aliado Formador (S/ 450)", "Platinum"));

    hackreg(&tmp)
        .arg("sponsor")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid option"));
}

// ============================================================================
// questions / check / lookup
// ============================================================================

#[test]
fn test_questions_hide_team_name_when_joining() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, "teamChoice: Unirme a equipo existente\n");

    hackreg(&tmp)
        .args(["questions", "hacker", "--answers"])
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("existingTeam"))
        .stdout(predicate::str::contains("teamName").not());
}

#[test]
fn test_questions_without_answers_hide_conditionals() {
    let tmp = TempDir::new().unwrap();

    let output = hackreg(&tmp)
        .args(["--format", "json", "questions"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let questions: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(questions.len(), 11);
    assert_eq!(questions[0]["id"], "name");
    assert_eq!(questions[10]["id"], "teamChoice");
}

#[test]
fn test_check_valid_answers() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, JOIN_TEAM);

    hackreg(&tmp)
        .arg("check")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Answers are valid"));
}

#[test]
fn test_check_reports_invalid_email() {
    let tmp = TempDir::new().unwrap();
    let answers = answers_file(&tmp, &JOIN_TEAM.replace("grace@example.com", "grace"));

    hackreg(&tmp)
        .arg("check")
        .arg(&answers)
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid email"));
}

#[test]
fn test_lookup_offline_education() {
    let tmp = TempDir::new().unwrap();

    hackreg(&tmp)
        .args(["lookup", "education", "uni"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Universidad Nacional de Ingeniería"));
}

#[test]
fn test_lookup_create_team_is_refused() {
    let tmp = TempDir::new().unwrap();

    hackreg(&tmp)
        .args(["lookup", "team", "Nuevo", "--create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be created"));
}

// ============================================================================
// config / completions
// ============================================================================

#[test]
fn test_config_keys() {
    let tmp = TempDir::new().unwrap();

    hackreg(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_url"))
        .stdout(predicate::str::contains("community_url"));
}

#[test]
fn test_config_show_reads_local_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("hackreg.yaml"), "api_url: https://api.example.com\n").unwrap();

    hackreg(&tmp)
        .args(["config", "show", "api_url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.example.com"));
}

#[test]
fn test_completions_bash() {
    Command::cargo_bin("hackreg")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hackreg"));
}
