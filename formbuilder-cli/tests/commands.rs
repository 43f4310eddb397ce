use assert_cmd::cargo::{self};
use predicates::prelude::*;
use predicates::str::contains;

const SPEC: &str = r#"{
  "title": "Adoption",
  "fields": [
    {"title": "Name", "name": "name", "type": "text", "isRequired": true, "validators": ["name"]},
    {"title": "Age", "name": "age", "type": "text", "validators": ["age"]},
    {"title": "Has a dog", "name": "hasDog", "type": "checkbox"},
    {"title": "Size", "name": "size", "type": "select", "values": ["small", "large"]}
  ]
}"#;

#[test]
fn render_prints_markup_for_an_inline_spec() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args(["render", "--spec", SPEC])
        .assert()
        .success()
        .stdout(contains("<legend>Adoption</legend>"))
        .stdout(contains(r#"<input name="hasDog" type="checkbox">"#))
        .stdout(contains(r#"<button type="submit">Submit</button>"#));
}

#[test]
fn render_reads_the_spec_from_stdin() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args(["render", "--spec", "-", "--submit-label", "Send"])
        .write_stdin(SPEC)
        .assert()
        .success()
        .stdout(contains(r#"<button type="submit">Send</button>"#));
}

#[test]
fn submit_prints_collected_values() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args([
            "submit", "--spec", SPEC, "--set", "name=Alice", "--set", "age=30", "--set",
            "size=large", "--no-pretty",
        ])
        .assert()
        .success()
        .stdout(contains(
            r#"{"name":"Alice","age":"30","hasDog":false,"size":"large"}"#,
        ));
}

#[test]
fn submit_can_print_urlencoded_output() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args([
            "submit", "--spec", SPEC, "--set", "name=Alice", "--set", "hasDog=yes",
            "--urlencoded",
        ])
        .assert()
        .success()
        .stdout(contains("name=Alice&age=&hasDog=on&size="));
}

#[test]
fn invalid_fields_are_reported_with_their_error_text() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args(["submit", "--spec", SPEC, "--set", "name=Alice", "--set", "age=abc"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(contains("age: Please, input correct data."));
}

#[test]
fn unknown_fields_are_rejected() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args(["submit", "--spec", SPEC, "--set", "colour=red"])
        .assert()
        .failure()
        .stderr(contains("input (colour): no such field in the form"));
}

#[test]
fn rejected_spec_documents_fail() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args(["render", "--spec", r#"{"title": "", "fields": []}"#])
        .assert()
        .failure()
        .stderr(contains("spec document rejected"));
}

#[test]
fn schema_describes_spec_documents() {
    cargo::cargo_bin_cmd!("formbuilder")
        .arg("schema")
        .assert()
        .success()
        .stdout(contains("isRequired"));
}

#[test]
fn unparsable_inline_specs_name_the_formats_tried() {
    cargo::cargo_bin_cmd!("formbuilder")
        .args(["render", "--spec", "{ not a document"])
        .assert()
        .failure()
        .stderr(contains("failed to parse inline spec: tried json"));
}
