use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use similar::{ChangeTag, TextDiff};

const NOW: &str = "2025-03-10T23:00:00-05:00";

struct Case {
    name: &'static str,
    args: &'static [&'static str],
}

const CASES: &[Case] = &[
    Case {
        name: "summary",
        args: &["summary", "--tz", "America/Chicago"],
    },
    Case {
        name: "classes_austin_window",
        args: &[
            "classes",
            "--tz",
            "America/Chicago",
            "--window-days",
            "14",
            "--city",
            "austin",
        ],
    },
    Case {
        name: "events",
        args: &["events", "--tz", "America/Chicago"],
    },
];

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn fixture_dir() -> PathBuf {
    project_root().join("fixtures")
}

fn golden_dir() -> PathBuf {
    project_root().join("golden")
}

fn update_golden() -> bool {
    std::env::var("UPDATE_GOLDEN").is_ok()
}

fn diff_strings(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(&format!("{sign}{change}"));
    }
    out
}

fn run_dancetime(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dancetime"))
        .args(args)
        .env_remove("DANCETIME_TIMEZONE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute dancetime")
}

fn check_golden(name: &str, output: Output) {
    assert!(
        output.status.success(),
        "dancetime failed for {}: {}",
        name,
        String::from_utf8_lossy(&output.stderr)
    );

    let actual = String::from_utf8(output.stdout).expect("Output is not valid UTF-8");
    let golden_path = golden_dir().join(format!("{name}.json"));

    if update_golden() {
        fs::create_dir_all(golden_dir()).ok();
        fs::write(&golden_path, &actual)
            .unwrap_or_else(|e| panic!("Failed to write golden file {golden_path:?}: {e}"));
        eprintln!("Updated golden file: {golden_path:?}");
        return;
    }

    let expected = fs::read_to_string(&golden_path).unwrap_or_else(|e| {
        panic!(
            "Golden file {golden_path:?} not found: {e}\n\
             Hint: Run with UPDATE_GOLDEN=1 to generate golden files"
        )
    });

    let expected_json: serde_json::Value =
        serde_json::from_str(&expected).expect("Golden file is not valid JSON");
    let actual_json: serde_json::Value =
        serde_json::from_str(&actual).expect("Output is not valid JSON");

    if actual_json != expected_json {
        let diff = diff_strings(
            &serde_json::to_string_pretty(&expected_json).unwrap(),
            &serde_json::to_string_pretty(&actual_json).unwrap(),
        );
        panic!(
            "Golden test mismatch for {name}:\n\n\
             {diff}\n\n\
             Run with UPDATE_GOLDEN=1 to refresh snapshots"
        );
    }
}

#[test]
fn golden_json_output() {
    let fixture = fixture_dir().join("dashboard.json");
    assert!(fixture.exists(), "Missing fixture {fixture:?}");
    let fixture = fixture.to_str().unwrap().to_string();

    for case in CASES {
        let mut args: Vec<&str> = case.args.to_vec();
        args.extend(["--input", fixture.as_str(), "--now", NOW]);
        check_golden(case.name, run_dancetime(&args));
    }
}

#[test]
fn golden_classify_late_evening_west_of_utc() {
    let output = run_dancetime(&[
        "classify",
        "--date",
        "2025-03-10",
        "--granularity",
        "day",
        "--now",
        NOW,
        "--tz",
        "Etc/GMT+5",
    ]);
    check_golden("classify_late_evening", output);
}

#[test]
fn classify_rejects_unparseable_date() {
    let output = run_dancetime(&["classify", "--date", "not-a-date", "--now", NOW]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    let envelope: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
    assert_eq!(envelope["status"], "unparseable");
    assert_eq!(envelope["input"], "not-a-date");
    assert_eq!(envelope["exit_code"], 2);
}

#[test]
fn invalid_timezone_is_input_error() {
    let output = run_dancetime(&[
        "classify",
        "--date",
        "2025-03-10",
        "--tz",
        "Mars/Olympus",
        "--output-format",
        "text",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid timezone 'Mars/Olympus'"));
}

#[test]
fn inverted_price_range_is_input_error() {
    let fixture = fixture_dir().join("dashboard.json");
    let output = run_dancetime(&[
        "classes",
        "--input",
        fixture.to_str().unwrap(),
        "--min-price",
        "50",
        "--max-price",
        "10",
        "--now",
        NOW,
    ]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn schedule_text_lists_both_kinds() {
    let fixture = fixture_dir().join("dashboard.json");
    let output = run_dancetime(&[
        "schedule",
        "--input",
        fixture.to_str().unwrap(),
        "--now",
        NOW,
        "--tz",
        "America/Chicago",
        "--output-format",
        "text",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("[today]"));
    assert!(lines[0].ends_with("class: Salsa Fundamentals"));
    assert!(lines[1].ends_with("event: Spring Salsa Social"));
    assert!(lines[6].ends_with("event: Winter Gala"));
}
