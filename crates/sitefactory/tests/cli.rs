use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sitefactory(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sitefactory").unwrap();
    cmd.arg("--root")
        .arg(root)
        .env_remove("SITEFACTORY_ROOT")
        .env_remove("HUGO_LOG_FILE")
        .env("HUGO_LOG_LEVEL", "quiet");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("templates/default");
    write(&template.join("hugo.toml"), "baseURL = \"/\"\ntitle = \"Default\"\n");
    write(
        &template.join("components.yml"),
        "components:\n  quiz-engine:\n    version: 1.0.0\n    status: stable\n    description: Interactive quizzes\n    sourcePath: components/quiz-engine\n",
    );
    for dir_name in ["content", "static", "archetypes"] {
        fs::create_dir_all(template.join(dir_name)).unwrap();
    }
    fs::create_dir_all(dir.path().join("components/quiz-engine")).unwrap();
    write(&dir.path().join("templates/draft/hugo.toml"), "title = \"Draft\"\n");
    fs::create_dir_all(dir.path().join("themes/compose")).unwrap();
    dir
}

#[test]
fn test_missing_template_exits_with_failure() {
    let ws = workspace();
    let output = ws.path().join("site");

    sitefactory(ws.path())
        .args(["build", "--template", "nonexistent", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Template directory not found"));

    assert!(!output.exists());
}

#[test]
fn test_unknown_environment_is_rejected() {
    let ws = workspace();

    sitefactory(ws.path())
        .args(["build", "--template", "default", "--environment", "qa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown environment 'qa'"));
}

#[test]
fn test_list_templates_with_readiness() {
    let ws = workspace();

    sitefactory(ws.path())
        .args(["list", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("ready"))
        .stdout(predicate::str::contains("draft"))
        .stdout(predicate::str::contains("incomplete"));
}

#[test]
fn test_list_components() {
    let ws = workspace();

    sitefactory(ws.path())
        .args(["list", "components"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quiz-engine"))
        .stdout(predicate::str::contains("Interactive quizzes"));
}

#[test]
fn test_validate_valid_template() {
    let ws = workspace();

    sitefactory(ws.path())
        .args(["validate", "default"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_validate_reports_errors() {
    let ws = workspace();
    write(&ws.path().join("templates/broken/content"), "not a directory");

    sitefactory(ws.path())
        .args(["validate", "broken"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing required file: hugo.toml"))
        .stdout(predicate::str::contains("content as file"));
}

#[test]
fn test_generated_template_validates() {
    let ws = workspace();

    sitefactory(ws.path())
        .args(["generate", "template", "blog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated template"))
        .stdout(predicate::str::contains("components.yml"));

    let template = ws.path().join("templates/blog");
    for file in ["hugo.toml", "components.yml", "content/_index.md", "archetypes/default.md"] {
        assert!(template.join(file).is_file(), "{file}");
    }

    sitefactory(ws.path())
        .args(["validate", "blog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("warning:").not());
}

#[test]
fn test_generate_refuses_existing_template_without_force() {
    let ws = workspace();

    sitefactory(ws.path())
        .args(["generate", "template", "default"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    sitefactory(ws.path())
        .args(["generate", "template", "default", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overwrote template"));
}

#[test]
fn test_generate_template_based_on_existing() {
    let ws = workspace();
    write(&ws.path().join("templates/default/content/_index.md"), "# Base\n");

    sitefactory(ws.path())
        .args(["generate", "template", "course", "--based-on", "default"])
        .assert()
        .success();

    let index = fs::read_to_string(ws.path().join("templates/course/content/_index.md")).unwrap();
    assert_eq!(index, "# Base\n");
}

#[test]
fn test_generate_component_prints_stanza() {
    let ws = workspace();

    sitefactory(ws.path())
        .args(["generate", "component", "analytics", "--status", "stable"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("  analytics:\n"))
        .stdout(predicate::str::contains("status: stable"))
        .stdout(predicate::str::contains("sourcePath: components/analytics"));

    sitefactory(ws.path())
        .args(["generate", "component", "analytics", "--status", "beta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status 'beta'"));
}
