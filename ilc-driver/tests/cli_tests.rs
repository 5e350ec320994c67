//! End-to-end runs of the `ilc` binary

use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// A scratch directory unique to one test
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ilc-cli-{}-{}", std::process::id(), test));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn ilc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ilc")).args(args).output().unwrap()
}

const HELLO: &str = r#"
extrn int puts(string s)

int main() {
    puts("hello");
    0
}
"#;

#[test]
fn test_compile_writes_assembly_next_to_input() {
    let dir = scratch_dir("compile");
    let input = dir.join("hello.il");
    fs::write(&input, HELLO).unwrap();

    let output = ilc(&["compile", input.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let asm = fs::read_to_string(dir.join("hello.s")).unwrap();
    assert!(asm.starts_with("#   headers\n.text\n.globl main\n"));
    assert!(asm.contains("    call puts@PLT\n"));
    assert!(asm.ends_with(".constant_0:\n    .asciz \"hello\"\n"));
}

#[test]
fn test_compile_flags_and_config_file() {
    let dir = scratch_dir("config");
    let input = dir.join("start.il");
    let config = dir.join("ilc.json");
    let out = dir.join("out.s");
    fs::write(&input, "int start() { 0 }").unwrap();
    fs::write(&config, r#"{ "entry_point": "start" }"#).unwrap();

    let output = ilc(&[
        "compile",
        input.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--no-comments",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let asm = fs::read_to_string(&out).unwrap();
    assert!(asm.starts_with(".text\n.globl start\nstart:\n"));
    assert!(!asm.contains('#'));
}

#[test]
fn test_diagnostics_prevent_output() {
    let dir = scratch_dir("diagnostics");
    let input = dir.join("bad.il");
    fs::write(&input, "int main() { true }").unwrap();

    let output = ilc(&["compile", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.join("bad.s").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: function main returns int but its body has type bool"));
}

#[test]
fn test_json_diagnostics() {
    let dir = scratch_dir("json");
    let input = dir.join("undeclared.il");
    fs::write(&input, "int main() { let a: int = b; a }").unwrap();

    let output = ilc(&["check", input.to_str().unwrap(), "--diagnostics", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let diagnostics = report["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics[0]["message"], "undeclared identifier b");
    assert_eq!(diagnostics[0]["location"]["line"], 1);
}

#[test]
fn test_missing_entry_point_fails() {
    let dir = scratch_dir("entry");
    let input = dir.join("lib.il");
    fs::write(&input, "int helper() { 0 }").unwrap();

    let output = ilc(&["compile", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No entry point 'main'"));
}

#[test]
fn test_parse_error_fails() {
    let dir = scratch_dir("parse");
    let input = dir.join("broken.il");
    fs::write(&input, "int main( { 0 }").unwrap();

    let output = ilc(&["check", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Parse error"));
}

#[test]
fn test_missing_input_fails() {
    let dir = scratch_dir("missing");
    let output = ilc(&["check", dir.join("nope.il").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_resolved_ast_carries_types() {
    let dir = scratch_dir("ast");
    let input = dir.join("answer.il");
    fs::write(&input, "int main() { 42 }").unwrap();

    let output = ilc(&["ast", input.to_str().unwrap(), "--resolved"]);
    assert!(output.status.success());

    let program: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(program["functions"][0]["name"]["name"], "main");
    assert_eq!(program["functions"][0]["body"]["expr_type"], "Integer");
}
