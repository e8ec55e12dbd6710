use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn tracker(store: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_price_tracker"))
        .args(args)
        .env("PRICE_TRACKER_PRODUCTS_FILE", store)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");

    child
        .stdin
        .as_mut()
        .expect("stdin open")
        .write_all(stdin.as_bytes())
        .expect("write stdin");

    child.wait_with_output().expect("read CLI output")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = tracker(&dir.path().join("products.json"), &["--help"], "");

    assert!(output.status.success());
    let text = stdout(&output);
    for name in ["add", "remove", "edit", "show", "run", "force-text"] {
        assert!(text.contains(name), "{name} missing from:\n{text}");
    }
}

#[test]
fn unknown_command_prints_usage_and_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = tracker(&dir.path().join("products.json"), &["refresh"], "");

    assert!(output.status.success());
    assert!(stdout(&output).contains("force-text"));
}

#[test]
fn usage_ignores_broken_configuration() {
    let dir = tempfile::tempdir().unwrap();
    for args in [&["--help"][..], &["refresh"][..], &[][..]] {
        let output = Command::new(env!("CARGO_BIN_EXE_price_tracker"))
            .args(args)
            .env("PRICE_TRACKER_PRODUCTS_FILE", dir.path().join("products.json"))
            .env("PRICE_TRACKER_REQUEST_TIMEOUT_SECS", "soon")
            .env("RUST_LOG", "off")
            .output()
            .expect("run CLI");

        assert!(output.status.success(), "{args:?} exited with {}", output.status);
        assert!(stdout(&output).contains("force-text"));
    }
}

#[test]
fn broken_configuration_is_fatal_for_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_price_tracker"))
        .arg("show")
        .env("PRICE_TRACKER_PRODUCTS_FILE", dir.path().join("products.json"))
        .env("PRICE_TRACKER_REQUEST_TIMEOUT_SECS", "soon")
        .env("RUST_LOG", "off")
        .output()
        .expect("run CLI");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load configuration"));
}

#[test]
fn show_without_store() {
    let dir = tempfile::tempdir().unwrap();
    let output = tracker(&dir.path().join("products.json"), &["show"], "");

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Not tracking any products. Run `price_tracker add`\n");
}

#[test]
fn add_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("products.json");

    let added = tracker(
        &store,
        &["add"],
        "Desk Lamp\nhttps://shop.test/lamp\nspan\na-price\nspan\na-symbol\n39.5\n",
    );
    assert!(
        added.status.success(),
        "cli exited with {}: {}",
        added.status,
        String::from_utf8_lossy(&added.stderr)
    );
    assert!(stdout(&added).contains("Successfully added \"Desk Lamp\""));

    let shown = tracker(&store, &["show"], "");
    let text = stdout(&shown);
    assert!(text.starts_with("NAME"));
    assert!(text.contains("Desk Lamp       40.50"), "unexpected table:\n{text}");
}

#[test]
fn remove_out_of_range_fails_without_touching_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("products.json");
    tracker(&store, &["add"], "Mug\nhttps://shop.test/mug\np\ncost\np\ncur\n8\n");
    let before = fs::read(&store).unwrap();

    let output = tracker(&store, &["remove"], "5\n");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
    assert_eq!(fs::read(&store).unwrap(), before);
}

#[test]
fn run_without_store_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = tracker(&dir.path().join("products.json"), &["run"], "");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}
