//! Integration tests for the ss binary

use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

fn ss() -> Command {
    Command::cargo_bin("ss").unwrap()
}

#[test]
fn test_sales_prints_summary_json() {
    ss().args(["-d", FIXTURES, "sales", "--start", "2026-02-01", "--end", "2026-02-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_revenue\": 1220.25"))
        .stdout(predicate::str::contains("\"order_count\": 230"));
}

#[test]
fn test_top_items_by_qty() {
    ss().args([
        "-d",
        FIXTURES,
        "top-items",
        "--start",
        "2026-02-01",
        "--end",
        "2026-02-07",
        "--sort-by",
        "qty",
        "--limit",
        "1",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"sortedBy\": \"qty\""))
    .stdout(predicate::str::contains("Latte"))
    .stdout(predicate::str::contains("Croissant").not());
}

#[test]
fn test_inventory_reports_alerts_on_stderr() {
    ss().args(["-d", FIXTURES, "inventory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"low_stock_count\": 2"))
        .stderr(predicate::str::contains("Espresso Beans"));
}

#[test]
fn test_inverted_range_fails() {
    ss().args(["-d", FIXTURES, "staffing", "--start", "2026-02-07", "--end", "2026-02-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("after end date"));
}

#[test]
fn test_missing_data_dir_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    ss().args(["-d"])
        .arg(temp.path())
        .arg("inventory")
        .assert()
        .failure()
        .stderr(predicate::str::contains("sales.json"));
}
