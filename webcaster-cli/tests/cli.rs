//! Integration tests for the webcaster-relay binary

use std::process::Command;

use tempfile::TempDir;

fn relay() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_webcaster-relay"));
    command.env_remove("WEBCASTER_RELAY_CONFIG");
    command
}

#[test]
fn help_lists_commands() {
    let output = relay().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Relay browser webcasts to Icecast"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("config"));
}

#[test]
fn config_show_masks_password() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[upstream]\npassword = \"hackme\"\nport = 8010\n").unwrap();

    let output = relay()
        .args(["config", "show", "--config"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port = 8010"));
    assert!(!stdout.contains("hackme"));
}

#[test]
fn config_path_honours_environment() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("relay.toml");

    let output = relay()
        .args(["config", "path"])
        .env("WEBCASTER_RELAY_CONFIG", &path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&*path.to_string_lossy()));
    assert!(stdout.contains("not found"));
}

#[test]
fn serve_without_auth_url_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[server]\nport = 0\n").unwrap();

    let output = relay()
        .args(["serve", "--config"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("auth.url"));
}
