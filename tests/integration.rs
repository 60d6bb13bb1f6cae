use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    fs::write(root.join("a.txt"), "hello").unwrap();
    fs::write(root.join("b.txt"), "world").unwrap();
    fs::write(root.join("logo.png"), [0x89_u8, b'P', b'N', b'G', 0, 0]).unwrap();

    fs::create_dir(root.join("src")).unwrap();
    fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();

    tmp
}

fn promptpack(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("promptpack").unwrap();
    cmd.current_dir(tmp.path()).env("HOME", tmp.path());
    cmd
}

#[test]
fn test_pack_explicit_files() {
    let tmp = setup_project();

    promptpack(&tmp)
        .args(["a.txt", "b.txt", "--request", "fix bugs", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote prompt.txt"))
        .stdout(predicate::str::contains("Total:"));

    let body = fs::read_to_string(tmp.path().join("prompt.txt")).unwrap();
    assert_eq!(
        body,
        "<a.txt>\nhello\n</a.txt>\n\n<b.txt>\nworld\n</b.txt>\n\n<request>\nfix bugs\n</request>"
    );
}

#[test]
fn test_pack_keeps_argument_order_and_trims_request() {
    let tmp = setup_project();

    promptpack(&tmp)
        .args(["b.txt", "a.txt", "b.txt", "-r", "  explain  ", "-o", "out.txt"])
        .assert()
        .success();

    let body = fs::read_to_string(tmp.path().join("out.txt")).unwrap();
    assert_eq!(
        body,
        "<b.txt>\nworld\n</b.txt>\n\n<a.txt>\nhello\n</a.txt>\n\n<request>\nexplain\n</request>"
    );
}

#[test]
fn test_pack_is_deterministic() {
    let tmp = setup_project();

    for out in ["one.txt", "two.txt"] {
        promptpack(&tmp)
            .args(["src/main.rs", "a.txt", "-r", "review", "-o", out])
            .assert()
            .success();
    }

    let one = fs::read(tmp.path().join("one.txt")).unwrap();
    let two = fs::read(tmp.path().join("two.txt")).unwrap();
    assert_eq!(one, two);
}

#[test]
fn test_pack_typescript_source() {
    let tmp = setup_project();
    fs::write(tmp.path().join("app.ts"), "export const x: number = 1;\n").unwrap();

    promptpack(&tmp)
        .args(["app.ts", "-r", "add types"])
        .assert()
        .success();

    let body = fs::read_to_string(tmp.path().join("prompt.txt")).unwrap();
    assert!(body.starts_with("<app.ts>\nexport const x: number = 1;\n\n</app.ts>"));
}

#[test]
fn test_list_file() {
    let tmp = setup_project();
    fs::write(
        tmp.path().join("files.txt"),
        "# context\nsrc/main.rs\n\nmissing.rs\nlogo.png\n",
    )
    .unwrap();

    promptpack(&tmp)
        .args(["--list", "files.txt", "-r", "review"])
        .assert()
        .success();

    let body = fs::read_to_string(tmp.path().join("prompt.txt")).unwrap();
    assert!(body.starts_with("<src/main.rs>\nfn main() {}\n\n</src/main.rs>\n\n<request>"));
    assert!(!body.contains("logo.png"));
}

#[test]
fn test_empty_request_is_fatal() {
    let tmp = setup_project();

    promptpack(&tmp)
        .args(["a.txt", "--request", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("request text is empty"));

    assert!(!tmp.path().join("prompt.txt").exists());
}

#[test]
fn test_no_valid_files_is_fatal() {
    let tmp = setup_project();

    promptpack(&tmp)
        .args(["missing.rs", "logo.png", "-r", "fix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid files in arguments"));

    assert!(!tmp.path().join("prompt.txt").exists());
}

#[test]
fn test_threshold_warning() {
    let tmp = setup_project();

    promptpack(&tmp)
        .args(["a.txt", "b.txt", "-r", "fix", "--threshold", "3", "--no-color"])
        .assert()
        .success()
        .stderr(predicate::str::contains("exceeds the 3 token threshold"));
}

#[test]
fn test_empty_directory_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("empty")).unwrap();

    promptpack(&tmp)
        .args(["--dir", "empty", "-r", "fix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no candidate files found"));
}

#[test]
fn test_local_config_sets_output() {
    let tmp = setup_project();
    fs::write(tmp.path().join(".promptpack.toml"), "output = \"context.md\"\n").unwrap();

    promptpack(&tmp)
        .args(["a.txt", "-r", "fix"])
        .assert()
        .success();

    assert!(tmp.path().join("context.md").exists());
    assert!(!tmp.path().join("prompt.txt").exists());
}

#[test]
fn test_init_local() {
    let tmp = setup_project();

    promptpack(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created local config"));

    assert!(tmp.path().join(".promptpack.toml").exists());

    promptpack(&tmp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force() {
    let tmp = setup_project();
    let config = tmp.path().join(".promptpack.toml");
    fs::write(&config, "existing content\n").unwrap();

    promptpack(&tmp).args(["init", "--force"]).assert().success();

    let content = fs::read_to_string(&config).unwrap();
    assert!(content.contains("promptpack configuration"));
}
