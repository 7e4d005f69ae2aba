use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mkcrypt"))
}

fn run_with_input(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn mkcrypt");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for mkcrypt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_strong_password_prints_sha512_crypt() {
    let output = run_with_input(&[], "Str0ngPass!\nStr0ngPass!\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("Password: \nVerify password: \n"));
    let line = out
        .lines()
        .find(|line| line.starts_with("Crypt: "))
        .expect("crypt line");
    let encoded = line.trim_start_matches("Crypt: ");
    assert!(encoded.starts_with("$6$"));
    assert!(mkcrypt_core::verify_hash(b"Str0ngPass!", encoded));
}

#[test]
fn test_short_password_fails_policy() {
    let output = run_with_input(&[], "abc\nabc\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Password must be at least 8 characters long"));
    assert!(!stdout(&output).contains("Crypt:"));
}

#[test]
fn test_different_passwords_fail() {
    let output = run_with_input(&[], "password1\npassword2\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Passwords are different, please try again."));
    assert!(!stdout(&output).contains("Crypt:"));
}

#[test]
fn test_padded_short_password_is_trimmed_then_rejected() {
    let output = run_with_input(&[], "  trimMe  \n  trimMe  \n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("at least 8 characters"));
}

#[test]
fn test_help_shows_usage_without_prompting() {
    for flag in ["-h", "--help"] {
        let output = run_with_input(&[flag], "");
        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("Usage: mkcrypt"));
        assert!(out.contains("--help"));
        assert!(!out.contains("Password:"));
    }
}

#[test]
fn test_unknown_options_are_ignored() {
    let output = run_with_input(&["--frobnicate", "-x"], "Str0ngPass!\nStr0ngPass!\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Crypt: $6$"));
}

#[test]
fn test_empty_input_fails_policy() {
    let output = run_with_input(&[], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("at least 8 characters"));
}

#[test]
fn test_version_flags_still_prompt_and_hash() {
    for flag in ["-V", "--version"] {
        let output = run_with_input(&[flag], "Str0ngPass!\nStr0ngPass!\n");
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let out = stdout(&output);
        assert!(out.starts_with("Password: "), "{} skipped the prompt", flag);
        assert!(out.contains("Crypt: $6$"));
    }
}

#[test]
fn test_abbreviated_help_shows_usage() {
    let output = run_with_input(&["--he"], "");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage: mkcrypt"));
}
