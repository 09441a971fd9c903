use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn xmlcodec() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("xmlcodec")?)
}

#[test]
fn decode_from_stdin_prints_json() -> Result<(), Box<dyn std::error::Error>> {
    xmlcodec()?
        .args(["decode", "--compact"])
        .write_stdin("<a><b type=\"integer\">1</b><c>2</c><d nil=\"true\"/></a>")
        .assert()
        .success()
        .stdout("{\"a\":{\"b\":1,\"c\":\"2\"}}\n");
    Ok(())
}

#[test]
fn decode_empty_input_is_empty_object() -> Result<(), Box<dyn std::error::Error>> {
    xmlcodec()?
        .args(["decode", "--compact"])
        .write_stdin("")
        .assert()
        .success()
        .stdout("{}\n");
    Ok(())
}

#[test]
fn encode_file_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("request.json");
    let output = dir.path().join("request.xml");
    fs::write(
        &input,
        r#"{"transaction": {"amount": "5 & 6", "credit_card": {"number": "4111"}}}"#,
    )?;

    xmlcodec()?
        .arg("encode")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let xml = fs::read_to_string(&output)?;
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<transaction>"));
    assert!(xml.contains("<amount>5 &amp; 6</amount>"));
    assert!(xml.contains("<credit-card>\n<number>4111</number>\n</credit-card>"));
    Ok(())
}

#[test]
fn decode_malformed_xml_fails() -> Result<(), Box<dyn std::error::Error>> {
    xmlcodec()?
        .arg("decode")
        .write_stdin("<a><b></a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode xml"));
    Ok(())
}

#[test]
fn errors_are_printed_with_logging_off() -> Result<(), Box<dyn std::error::Error>> {
    xmlcodec()?
        .arg("decode")
        .env("RUST_LOG", "off")
        .write_stdin("<a><b></a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode xml"))
        .stderr(predicate::str::contains("mismatched closing tag"));
    Ok(())
}

#[test]
fn decode_respects_depth_limit() -> Result<(), Box<dyn std::error::Error>> {
    xmlcodec()?
        .args(["decode", "--max-depth", "2"])
        .write_stdin("<a><b><c>deep</c></b></a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("max depth exceeded"));
    Ok(())
}

#[test]
fn encode_rejects_non_object_json() -> Result<(), Box<dyn std::error::Error>> {
    xmlcodec()?
        .arg("encode")
        .write_stdin("[1, 2, 3]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input must be a json object"));
    Ok(())
}

#[test]
fn missing_input_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    xmlcodec()?
        .args(["decode", "does-not-exist.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input file"));
    Ok(())
}
