use assert_cmd::Command;
use predicates::prelude::*;

const SHEET: &str = "\
Activity Date,Cat,Task,Plan Count,Done Count,Plan Mins,Done Mins
2025-01-13,Ops,Deploy,2,2,60,45
2025-01-16,Ops,Review,3,1,30,50
2025-01-21,Ops,Deploy,1,0,20,0
";

fn weekly_summary() -> Command {
    let mut cmd = Command::cargo_bin("weekly-summary").unwrap();
    cmd.env("NO_COLOR", "1").env("RUST_LOG", "off");
    cmd
}

#[test]
fn preview_prints_three_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.csv");
    std::fs::write(&path, SHEET).unwrap();

    weekly_summary()
        .args(["preview", path.to_str().unwrap(), "--today", "2025-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1) Current Week Statistics (2025-01-13 to 2025-01-19)",
        ))
        .stdout(predicate::str::contains("2) Next Week Plan (2025-01-20 to 2025-01-26)"))
        .stdout(predicate::str::contains("3) Plan vs Actual Deviation / Interference"))
        .stdout(predicate::str::contains("Deploy"));
}

#[test]
fn preview_rejects_unsupported_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.txt");
    std::fs::write(&path, SHEET).unwrap();

    weekly_summary()
        .args(["preview", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn preview_requires_date_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.csv");
    std::fs::write(&path, "Task,Owner\nDeploy,sam\n").unwrap();

    weekly_summary()
        .args(["preview", path.to_str().unwrap(), "--today", "2025-01-15"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No column containing 'date' found"));
}

#[test]
fn preview_rejects_bad_today() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.csv");
    std::fs::write(&path, SHEET).unwrap();

    weekly_summary()
        .args(["preview", path.to_str().unwrap(), "--today", "next tuesday"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--today expects YYYY-MM-DD"));
}

#[test]
fn send_rejects_bad_receiver_before_mailing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.csv");
    std::fs::write(&path, SHEET).unwrap();

    weekly_summary()
        .env("HOME", dir.path())
        .env("EMAIL_FROM", "reports@example.com")
        .env("SMTP_PASSWORD", "unused")
        .env("SMTP_SERVER", "localhost")
        .env("SMTP_PORT", "2525")
        .args(["send", path.to_str().unwrap(), "--to", "not an address"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid email address"));
}
