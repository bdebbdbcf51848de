use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

const FIXTURE: &str = "../doclens/tests/fixtures/document.xml";

#[test]
fn test_inspect_treeviz_is_default() {
    let mut cmd = cargo_bin_cmd!("doclens");
    cmd.arg("inspect").arg(FIXTURE);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("└─ w:document #1"))
        .stdout(predicate::str::contains("\"Introduction\""));
}

#[test]
fn test_inspect_json() {
    let mut cmd = cargo_bin_cmd!("doclens");
    cmd.arg("inspect").arg(FIXTURE).arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["kind"], "document");
    assert_eq!(value["children"][0]["name"], "w:document");
}

#[test]
fn test_inspect_html_with_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let view = dir.path().join("view.html");
    fs::write(&view, "<html><body><p id=\"word3\">x</p></body></html>").unwrap();

    let mut cmd = cargo_bin_cmd!("doclens");
    cmd.arg("inspect").arg(&view).arg("--attributes");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("p #3 "))
        .stdout(predicate::str::contains("id=\"word3\""));
}

#[test]
fn test_normalize_flattens_inline_markup() {
    let dir = tempfile::tempdir().unwrap();
    let view = dir.path().join("view.html");
    fs::write(&view, "<html><body><div><p>a <b>b</b></p></div></body></html>").unwrap();

    let mut cmd = cargo_bin_cmd!("doclens");
    cmd.arg("normalize").arg(&view);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "<p><span>a </span><span style=\"font-weight: bold\">b</span></p>",
        ))
        .stdout(predicate::str::contains("<div>").not());
}
