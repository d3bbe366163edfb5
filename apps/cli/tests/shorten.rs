use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn shorten_honours_flags() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?
        .args([
            "shorten",
            "/home/alice/dev/proj/src/main.rs",
            "--max-dirs",
            "2",
            "--separator",
            "/",
        ])
        .assert()
        .success()
        .stdout("/home/.../proj/src/main.rs\n");
    Ok(())
}

#[test]
fn shorten_falls_back_to_configured_budget() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let config_dir = workspace.path().join(".foldertools");
    fs::create_dir_all(&config_dir)?;
    fs::write(
        config_dir.join("config.json"),
        r#"{ "status_bar": { "max_dirs": 1 } }"#,
    )?;

    cli(workspace.path())?
        .args(["shorten", r"C:\Users\alice\dev\file.py", "--separator", r"\"])
        .assert()
        .success()
        .stdout("C:\\...\\dev\\file.py\n");
    Ok(())
}

#[test]
fn status_prints_key_and_value() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let file = workspace.path().join("notes.txt");
    cli(workspace.path())?
        .args(["status", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("zPath\t"))
        .stdout(predicate::str::contains("notes.txt"));
    Ok(())
}

#[test]
fn config_set_max_dirs_persists() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?
        .args(["config", "set-max-dirs", "5"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Status bar now keeps 5 directories"));
    cli(workspace.path())?
        .args(["config", "set-max-dirs", "5"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Status bar already keeps 5"));

    let saved = fs::read_to_string(workspace.path().join(".foldertools").join("config.json"))?;
    let value: serde_json::Value = serde_json::from_str(&saved)?;
    assert_eq!(value["status_bar"]["max_dirs"], 5);

    cli(workspace.path())?
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_dirs\": 5"))
        .stdout(predicate::str::contains("\"extension\": \"sublime-project\""));
    Ok(())
}

fn cli(workspace: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("foldertools")?;
    cmd.current_dir(workspace)
        .env("FOLDERTOOLS_LOG", "off")
        .arg("--workspace")
        .arg(workspace);
    Ok(cmd)
}
