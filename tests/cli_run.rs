//! CLI integration tests for a short accelerated run.

use std::io::Write;
use std::process::{Command, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_mining_fleet");

fn summary_value<'a>(stdout: &'a str, key: &str) -> &'a str {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(key))
        .unwrap_or_else(|| panic!("{key} line missing"))
        .trim()
}

#[test]
fn accelerated_run_prints_summary_with_unloads() {
    // 72 simulated hours squeezed into about 2.6s of wall time.
    let output = Command::new(BIN)
        .args(["--trucks", "3", "--stations", "2", "--speed-factor", "100000", "--seed", "1"])
        .output()
        .expect("failed to run simulation binary");

    assert!(
        output.status.success(),
        "simulation exited with non-zero status: {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("SIMULATION SUMMARY"),
        "summary missing from output"
    );
    assert!(stdout.contains("trucks=3 stations=2"));

    let total: u64 = summary_value(&stdout, "total_unloads=")
        .parse()
        .expect("total_unloads is a number");
    assert!(total > 0, "no unloads recorded:\n{stdout}");
}

#[test]
fn counts_are_prompted_when_omitted() {
    let mut child = Command::new(BIN)
        .args(["--hours", "1", "--speed-factor", "100000"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to run simulation binary");

    // The first truck answer is rejected and asked again.
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(b"0\n2\n1\n")
        .expect("write answers");

    let output = child.wait_with_output().expect("wait for simulation");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid number of Trucks"));
    assert!(stdout.contains("trucks=2 stations=1"));
}

#[test]
fn zero_speed_factor_is_rejected() {
    let output = Command::new(BIN)
        .args(["--trucks", "1", "--stations", "1", "--speed-factor", "0"])
        .output()
        .expect("failed to run simulation binary");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("speed factor must be greater than zero"));
}
