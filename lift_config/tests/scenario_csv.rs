use std::fs::File;
use std::io::Write;

use lift_config::{ButtonName, PressRow, load_scenario_csv};
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scenario.csv");
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    (dir, path)
}

#[rstest]
fn loads_rows_in_order() {
    let (_dir, path) = write_csv("at_ms,button,floor\n0,car,4\n1500, down ,6\n1500,up,2\n");
    let rows = load_scenario_csv(&path).unwrap();
    assert_eq!(
        rows,
        vec![
            PressRow {
                at_ms: 0,
                button: ButtonName::Car,
                floor: 4
            },
            PressRow {
                at_ms: 1500,
                button: ButtonName::Down,
                floor: 6
            },
            PressRow {
                at_ms: 1500,
                button: ButtonName::Up,
                floor: 2
            },
        ]
    );
}

#[rstest]
fn header_only_is_an_empty_scenario() {
    let (_dir, path) = write_csv("at_ms,button,floor\n");
    assert!(load_scenario_csv(&path).unwrap().is_empty());
}

#[rstest]
#[case("time,button,floor\n0,car,4\n", "must have headers")]
#[case("at_ms,button,floor\n100,car,4\n50,car,2\n", "ordered by at_ms")]
#[case("at_ms,button,floor\n0,lift,4\n", "invalid CSV row 2")]
#[case("at_ms,button,floor\n0,car,0\n", "floor must be >= 1")]
#[case("at_ms,button,floor\n-5,car,3\n", "invalid CSV row 2")]
fn rejects_malformed_files(#[case] body: &str, #[case] needle: &str) {
    let (_dir, path) = write_csv(body);
    let err = load_scenario_csv(&path).expect_err("should reject");
    assert!(
        err.to_string().contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[rstest]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = load_scenario_csv(&path).unwrap_err();
    assert!(err.to_string().contains("open scenario CSV"));
}
