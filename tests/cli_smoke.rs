use predicates::prelude::*;
use std::fs;

#[test]
fn sample_prints_dataset_json() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("phy-fake-server");
    cmd.arg("sample");
    let output = cmd.assert().success().get_output().stdout.clone();

    let dataset: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(dataset["servers"].as_array().unwrap().len(), 2);
    assert_eq!(dataset["servers"][0]["server"]["server_id"], "100000000001");
}

#[test]
fn rejects_zero_action_interval() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("phy-fake-server");
    cmd.args(["--action-interval-ms", "0", "sample"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("1..=60000"));
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("phy-fake-server");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sample"))
        .stdout(predicate::str::contains("--action-interval-ms"));
}

#[test]
fn run_fails_on_unsupported_dataset_extension() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("seed.toml");
    fs::write(&path, "servers = []").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("phy-fake-server");
    cmd.env_remove("PHY_FAKE_ADDR");
    cmd.args(["run", "--addr", "127.0.0.1:0", "--data"]);
    cmd.arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unsupported dataset format"));
}

#[test]
fn run_fails_on_missing_dataset() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("missing.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("phy-fake-server");
    cmd.args(["run", "--addr", "127.0.0.1:0", "--data"]);
    cmd.arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("load dataset from"));
}

#[cfg(unix)]
#[test]
fn run_exits_cleanly_on_sigterm() {
    use std::io::{BufRead, BufReader};
    use std::process::{Command, Stdio};
    use std::time::{Duration, Instant};

    let mut child = Command::new(env!("CARGO_BIN_EXE_phy-fake-server"))
        .args(["run", "--addr", "127.0.0.1:0", "--sample"])
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .env_remove("PHY_FAKE_DATA")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stderr = BufReader::new(child.stderr.take().unwrap());
    let mut line = String::new();
    loop {
        line.clear();
        let read = stderr.read_line(&mut line).unwrap();
        assert!(read > 0, "server exited before listening");
        if line.contains("phy-fake-server listening") {
            break;
        }
    }

    let status = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(10);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("server did not stop after SIGTERM");
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    assert!(exit.success(), "{exit:?}");
}
