use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;

const CSV: &str = "\
station,gpm,era5
1.0,1.2,0.9
2.0,2.1,2.2
3.0,2.8,3.1
4.0,4.3,3.8
5.0,4.9,5.2
";

fn write_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("precip.csv");
    fs::write(&path, CSV).expect("write fixture");
    path
}

#[test]
fn cli_renders_svg_to_stdout() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = write_fixture(tmp.path());

    let exe = assert_cmd::cargo_bin!("taylogram-cli");
    let assert = Command::new(exe)
        .args(["render", fixture.to_string_lossy().as_ref()])
        .assert()
        .success();

    let svg = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"aria-roledescription="taylor""#));
    assert!(svg.contains("Correlation"));
}

#[test]
fn cli_renders_png_smoke() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = write_fixture(tmp.path());
    let out = tmp.path().join("out.png");

    let exe = assert_cmd::cargo_bin!("taylogram-cli");
    Command::new(exe)
        .args([
            "render",
            "--format",
            "png",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );
}

#[test]
fn cli_stats_prints_derived_coordinates() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let fixture = write_fixture(tmp.path());

    let exe = assert_cmd::cargo_bin!("taylogram-cli");
    let assert = Command::new(exe)
        .args(["stats", "--pretty", fixture.to_string_lossy().as_ref()])
        .assert()
        .success();

    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 json");
    let value: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(value["reference"], "station");
    let samples = value["samples"].as_array().expect("samples array");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["name"], "gpm");
    let r = samples[0]["correlation"].as_f64().unwrap();
    assert!(r > 0.9 && r <= 1.0);
}

#[test]
fn cli_rejects_misaligned_columns_with_exit_code_one() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("ragged.csv");
    fs::write(&path, "a,b\n1,2\n3\n").expect("write fixture");

    let exe = assert_cmd::cargo_bin!("taylogram-cli");
    Command::new(exe)
        .args(["render", path.to_string_lossy().as_ref()])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn cli_usage_error_exits_with_code_two() {
    let exe = assert_cmd::cargo_bin!("taylogram-cli");
    Command::new(exe)
        .args(["--no-such-flag"])
        .assert()
        .failure()
        .code(2);
}
