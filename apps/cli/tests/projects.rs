use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

#[test]
fn save_list_show_and_remove() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let site = workspace.path().join("site");
    fs::create_dir_all(&site)?;

    cli(workspace.path())?
        .args(["projects", "save", "site", "--folder", site.to_str().unwrap()])
        .assert()
        .success()
        .stdout("Project: site created.\n");

    let saved = workspace
        .path()
        .join(".foldertools")
        .join("projects")
        .join("site.sublime-project");
    assert!(saved.exists());

    cli(workspace.path())?
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("site\t"));

    cli(workspace.path())?
        .args(["projects", "show", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"folders\""));

    cli(workspace.path())?
        .args(["projects", "remove", "site"])
        .assert()
        .success()
        .stdout("Project: site removed.\n");
    assert!(!saved.exists());

    cli(workspace.path())?
        .args(["projects", "remove", "site"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Project: project file"))
        .stderr(predicate::str::contains("was not found"));
    Ok(())
}

#[test]
fn show_malformed_project_reports_status_message() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let projects = workspace.path().join(".foldertools").join("projects");
    fs::create_dir_all(&projects)?;
    fs::write(projects.join("broken.sublime-project"), r#"{ "settings": {} }"#)?;

    cli(workspace.path())?
        .args(["projects", "show", "broken"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Project: malformed project file"))
        .stderr(predicate::str::contains("missing 'folders' key"));
    Ok(())
}

#[test]
fn projects_dir_flag_overrides_config() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let elsewhere = tempdir()?;

    cli(workspace.path())?
        .arg("--projects-dir")
        .arg(elsewhere.path())
        .args(["projects", "save", "remote", "--folder", "/srv/remote"])
        .assert()
        .success();

    assert!(elsewhere.path().join("remote.sublime-project").exists());
    assert!(!workspace.path().join(".foldertools").join("projects").exists());
    Ok(())
}

#[test]
fn open_replaces_session_folders() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let session = workspace.path().join("session.json");
    fs::write(
        &session,
        json!({
            "folders": [{ "path": "/previous" }],
            "settings": { "tab_size": 4 }
        })
        .to_string(),
    )?;

    cli(workspace.path())?
        .args(["projects", "save", "docs", "--folder", "/srv/docs", "--folder", "/srv/api"])
        .assert()
        .success();
    cli(workspace.path())?
        .args(["projects", "open", "docs", "--session", session.to_str().unwrap()])
        .assert()
        .success()
        .stdout("Project: docs opened.\n");

    let live: Value = serde_json::from_str(&fs::read_to_string(&session)?)?;
    assert_eq!(
        live["folders"],
        json!([{ "path": "/srv/docs" }, { "path": "/srv/api" }])
    );
    assert_eq!(live["settings"], json!({ "tab_size": 4 }));
    Ok(())
}

#[test]
fn open_keeps_session_settings_over_project_settings() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let source = workspace.path().join("source.json");
    fs::write(
        &source,
        json!({
            "folders": [{ "path": "/srv/lib" }],
            "settings": { "tab_size": 2 },
            "build_systems": [{ "name": "cargo" }]
        })
        .to_string(),
    )?;
    cli(workspace.path())?
        .args(["projects", "save", "lib", "--from", source.to_str().unwrap()])
        .assert()
        .success();

    let session = workspace.path().join("session.json");
    fs::write(
        &session,
        json!({ "folders": [{ "path": "/old" }], "settings": { "tab_size": 8 } }).to_string(),
    )?;
    cli(workspace.path())?
        .args(["projects", "open", "lib", "--session", session.to_str().unwrap()])
        .assert()
        .success();

    let live: Value = serde_json::from_str(&fs::read_to_string(&session)?)?;
    assert_eq!(live["folders"], json!([{ "path": "/srv/lib" }]));
    assert_eq!(live["settings"], json!({ "tab_size": 8 }));
    assert_eq!(live["build_systems"], json!([{ "name": "cargo" }]));

    cli(workspace.path())?
        .args(["projects", "close", "--session", session.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("closed.\n"));
    let closed: Value = serde_json::from_str(&fs::read_to_string(&session)?)?;
    assert_eq!(closed, json!({}));
    Ok(())
}

#[test]
fn save_from_session_keeps_settings() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let session = workspace.path().join("session.json");
    fs::write(
        &session,
        json!({
            "folders": [{ "path": "/srv/app", "folder_exclude_patterns": ["target"] }],
            "settings": { "rulers": [100] }
        })
        .to_string(),
    )?;

    cli(workspace.path())?
        .args(["projects", "save", "app", "--from", session.to_str().unwrap()])
        .assert()
        .success();

    let saved = workspace
        .path()
        .join(".foldertools")
        .join("projects")
        .join("app.sublime-project");
    let document: Value = serde_json::from_str(&fs::read_to_string(saved)?)?;
    assert_eq!(document["folders"][0]["folder_exclude_patterns"], json!(["target"]));
    assert_eq!(document["settings"], json!({ "rulers": [100] }));
    Ok(())
}

#[test]
fn save_from_empty_session_fails() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let session = workspace.path().join("empty.json");
    fs::write(&session, "{}")?;

    cli(workspace.path())?
        .args(["projects", "save", "nothing", "--from", session.to_str().unwrap()])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn pick_reads_choice_from_stdin() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let session = workspace.path().join("session.json");
    for (name, folder) in [("alpha", "/srv/alpha"), ("beta", "/srv/beta")] {
        cli(workspace.path())?
            .args(["projects", "save", name, "--folder", folder])
            .assert()
            .success();
    }

    cli(workspace.path())?
        .args(["projects", "pick", "--session", session.to_str().unwrap()])
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout("Project: beta opened.\n")
        .stderr(predicate::str::contains("alpha"));

    let live: Value = serde_json::from_str(&fs::read_to_string(&session)?)?;
    assert_eq!(live["folders"], json!([{ "path": "/srv/beta" }]));
    Ok(())
}

#[test]
fn pick_cancelled_leaves_session_untouched() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let session = workspace.path().join("session.json");
    cli(workspace.path())?
        .args(["projects", "save", "alpha", "--folder", "/srv/alpha"])
        .assert()
        .success();

    cli(workspace.path())?
        .args(["projects", "pick", "--session", session.to_str().unwrap()])
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(!session.exists());
    Ok(())
}

#[test]
fn browse_opens_chosen_subfolder_as_root() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let root = workspace.path().join("mono");
    fs::create_dir_all(root.join("api"))?;
    fs::create_dir_all(root.join("web"))?;
    fs::write(root.join("README.md"), "mono")?;
    let session = workspace.path().join("session.json");

    cli(workspace.path())?
        .args(["projects", "save", "mono", "--folder", root.to_str().unwrap()])
        .assert()
        .success();

    // First line picks the project, second the "web" directory.
    cli(workspace.path())?
        .args([
            "projects",
            "pick",
            "--action",
            "browse",
            "--filter",
            "dirs",
            "--session",
            session.to_str().unwrap(),
        ])
        .write_stdin("0\n1\n")
        .assert()
        .success();

    let live: Value = serde_json::from_str(&fs::read_to_string(&session)?)?;
    assert_eq!(
        live["folders"],
        json!([{ "path": root.join("web").display().to_string() }])
    );
    Ok(())
}

#[test]
fn parent_moves_root_up() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let session = workspace.path().join("session.json");
    fs::write(&session, json!({ "folders": [{ "path": "/srv/app/src" }] }).to_string())?;

    cli(workspace.path())?
        .args(["projects", "parent", "--session", session.to_str().unwrap()])
        .assert()
        .success();

    let live: Value = serde_json::from_str(&fs::read_to_string(&session)?)?;
    assert_eq!(live["folders"], json!([{ "path": "/srv/app" }]));
    Ok(())
}

#[test]
fn empty_store_lists_nothing() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    cli(workspace.path())?
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("No projects found"));
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
